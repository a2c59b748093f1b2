/// Property-based tests for the response parser and amount coercion
use bluesdr::dashboard::coerce_amount;
use bluesdr::leads::{
    build_analysis_prompt, parse_response, parse_structured, ResponseFormat, LEAD_ANALYSIS_SCHEMA,
};
use bluesdr::BlueSdrError;
use proptest::prelude::*;

proptest! {
    #[test]
    fn six_or_more_fields_keep_the_first_six(
        fields in prop::collection::vec("[^|]{0,12}", 6..10)
    ) {
        let raw = fields.join("|");
        let analysis = parse_response(&raw).unwrap();
        let parsed: Vec<String> = analysis.fields().iter().map(|f| f.to_string()).collect();
        prop_assert_eq!(parsed, fields[..6].to_vec());
    }

    #[test]
    fn fewer_than_six_fields_fail(
        fields in prop::collection::vec("[^|]{0,12}", 1..6)
    ) {
        let raw = fields.join("|");
        match parse_response(&raw) {
            Err(BlueSdrError::InsufficientContext { expected, found }) => {
                prop_assert_eq!(expected, 6);
                prop_assert_eq!(found, fields.len());
            }
            other => prop_assert!(false, "expected insufficient context, got {:?}", other),
        }
    }

    #[test]
    fn parser_never_panics(raw in "\\PC*") {
        let _ = parse_response(&raw);
        let _ = parse_structured(&raw);
    }

    #[test]
    fn incomplete_objects_are_never_split_on_pipes(
        values in prop::collection::vec("[a-z|]{0,12}", 5),
        missing in 0usize..6
    ) {
        let mut object = serde_json::Map::new();
        let mut values = values.into_iter();
        for (i, field) in LEAD_ANALYSIS_SCHEMA.iter().enumerate() {
            if i == missing {
                continue;
            }
            if let Some(value) = values.next() {
                object.insert(field.key.to_string(), serde_json::Value::String(value));
            }
        }

        let raw = serde_json::Value::Object(object).to_string();
        match parse_structured(&raw) {
            Err(BlueSdrError::InsufficientContext { found, .. }) => prop_assert_eq!(found, 5),
            other => prop_assert!(false, "expected insufficient context, got {:?}", other),
        }
    }
}

proptest! {
    #[test]
    fn prompt_embeds_transcript_verbatim(transcript in "\\PC{0,200}") {
        for format in [ResponseFormat::Json, ResponseFormat::Delimited] {
            let prompt = build_analysis_prompt(&transcript, format);
            prop_assert!(prompt.ends_with(&transcript));
        }
    }

    #[test]
    fn amount_coercion_is_finite_and_non_negative_for_plain_numbers(value in 0u32..10_000_000) {
        let amount = coerce_amount(&value.to_string());
        prop_assert!(amount.is_finite());
        prop_assert_eq!(amount, value as f64);
    }

    #[test]
    fn amount_coercion_never_panics(raw in "\\PC*") {
        prop_assert!(coerce_amount(&raw).is_finite());
    }
}
