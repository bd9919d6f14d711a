//! Content sniffing that tags an extracted value with its document family

use respi_core::DocType;
use serde_json::Value;

/// Tag one extracted value. First match wins:
///
/// 1. `pollutant_standards` / `general_health_risks` keys: WHO air quality standard
/// 2. `section_1_introduction` key and "ATSDR" anywhere: ATSDR public health guidance
/// 3. `disease_definition` / `treatment_tracks` keys: GINA asthma guide
/// 4. `part_i_definitions` key or "pheic" anywhere: WHO IHR regulation
///
/// Key checks look at top-level keys only. Substring checks run over the
/// serialized record, keys and values alike.
pub fn classify(record: &Value) -> Option<DocType> {
    let has_key = |key: &str| {
        record
            .as_object()
            .is_some_and(|object| object.contains_key(key))
    };
    let serialized = record.to_string();

    if has_key("pollutant_standards") || has_key("general_health_risks") {
        Some(DocType::EnvironmentalStandard)
    } else if has_key("section_1_introduction") && serialized.contains("ATSDR") {
        Some(DocType::PublicHealthGuidance)
    } else if has_key("disease_definition") || has_key("treatment_tracks") {
        Some(DocType::ClinicalAsthmaGuide)
    } else if has_key("part_i_definitions") || serialized.contains("pheic") {
        Some(DocType::InternationalRegulation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pollutant_standards_is_who_guideline() {
        let record = json!({"pollutant_standards": [{"pollutant": "PM2.5", "annual": 5}]});
        let tag = classify(&record).unwrap();
        assert_eq!(tag, DocType::EnvironmentalStandard);
        assert_eq!(tag.source(), "WHO Air Quality Guidelines");

        let risks_only = json!({"general_health_risks": {"short_term": "irritation"}});
        assert_eq!(classify(&risks_only), Some(DocType::EnvironmentalStandard));
    }

    #[test]
    fn test_disease_definition_is_gina() {
        let record = json!({"disease_definition": "Asthma is a heterogeneous disease"});
        let tag = classify(&record).unwrap();
        assert_eq!(tag, DocType::ClinicalAsthmaGuide);
        assert_eq!(tag.source(), "GINA 2023 Asthma Pocket Guide");

        assert_eq!(
            classify(&json!({"treatment_tracks": ["track 1"]})),
            Some(DocType::ClinicalAsthmaGuide)
        );
    }

    #[test]
    fn test_atsdr_requires_key_and_marker() {
        let record = json!({"section_1_introduction": "Published by ATSDR"});
        assert_eq!(classify(&record), Some(DocType::PublicHealthGuidance));

        let no_marker = json!({"section_1_introduction": "Published by CDC"});
        assert_eq!(classify(&no_marker), None);

        let marker_without_key = json!({"intro": "ATSDR"});
        assert_eq!(classify(&marker_without_key), None);
    }

    #[test]
    fn test_ihr_by_key_or_marker() {
        assert_eq!(
            classify(&json!({"part_i_definitions": {}})),
            Some(DocType::InternationalRegulation)
        );
        assert_eq!(
            classify(&json!({"article_12": "determination of a pheic"})),
            Some(DocType::InternationalRegulation)
        );
    }

    #[test]
    fn test_priority_order_breaks_ties() {
        let who_and_gina = json!({
            "pollutant_standards": [],
            "disease_definition": "asthma"
        });
        assert_eq!(classify(&who_and_gina), Some(DocType::EnvironmentalStandard));

        let atsdr_and_ihr = json!({
            "section_1_introduction": "ATSDR overview",
            "part_i_definitions": {}
        });
        assert_eq!(classify(&atsdr_and_ihr), Some(DocType::PublicHealthGuidance));

        let gina_and_pheic = json!({
            "treatment_tracks": ["a"],
            "notes": "not a pheic"
        });
        assert_eq!(classify(&gina_and_pheic), Some(DocType::ClinicalAsthmaGuide));
    }

    #[test]
    fn test_unmatched_record_is_untagged() {
        assert_eq!(classify(&json!({"good_practice_statements": ["Avoid smoking"]})), None);
        assert_eq!(classify(&json!(["pollutant_standards"])), None);
        assert_eq!(classify(&json!("plain text")), None);
    }
}
