use std::collections::BTreeMap;

use serde_json::Value;

use crate::domains::Domain;
use crate::models::{ClinicalField, ValueDomain};

use super::types::{NormalizedInput, RawInput, ValidationError};

/// Validate a raw request against the domain's field catalogue, map labels to
/// codes, compute derived fields and lay out the model feature vector.
pub fn normalize<D: Domain>(raw: &RawInput) -> Result<NormalizedInput, ValidationError> {
    let mut values = normalize_fields(D::fields(), raw)?;

    for (key, value) in D::derive(&values) {
        values.insert(key, value);
    }

    let features = D::feature_order()
        .iter()
        .map(|&key| {
            values
                .get(key)
                .copied()
                .ok_or(ValidationError::MissingField { field: key })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(NormalizedInput { values, features })
}

/// Convert every non-derived field. Unknown and derived keys are rejected
/// before any value is inspected.
pub fn normalize_fields(
    fields: &'static [ClinicalField],
    raw: &RawInput,
) -> Result<BTreeMap<&'static str, f64>, ValidationError> {
    for key in raw.keys() {
        match fields.iter().find(|f| f.key == key.as_str()) {
            None => {
                return Err(ValidationError::UnknownField { field: key.clone() });
            }
            Some(field) if field.domain.is_derived() => {
                return Err(ValidationError::DerivedField { field: field.key });
            }
            Some(_) => {}
        }
    }

    let mut values = BTreeMap::new();
    for field in fields.iter().filter(|f| !f.domain.is_derived()) {
        let value = raw
            .get(field.key)
            .ok_or(ValidationError::MissingField { field: field.key })?;
        values.insert(field.key, convert(field, value)?);
    }
    Ok(values)
}

fn convert(field: &ClinicalField, value: &Value) -> Result<f64, ValidationError> {
    match field.domain {
        ValueDomain::Numeric { min, max } => {
            let v = value.as_f64().ok_or(ValidationError::WrongType {
                field: field.key,
                expected: "a number",
            })?;
            check_range(field, v, min, max)
        }
        ValueDomain::Integer { min, max } => {
            let v = value.as_f64().ok_or(ValidationError::WrongType {
                field: field.key,
                expected: "a whole number",
            })?;
            if v.fract() != 0.0 {
                return Err(ValidationError::NotInteger { field: field.key, value: v });
            }
            check_range(field, v, min as f64, max as f64)
        }
        ValueDomain::Categorical { options } => match value {
            Value::String(label) => field
                .domain
                .code_for_label(label)
                .map(|code| code as f64)
                .ok_or_else(|| ValidationError::UnknownCategory {
                    field: field.key,
                    value: label.clone(),
                }),
            Value::Number(n) => {
                let v = n.as_f64().unwrap_or(f64::NAN);
                options
                    .iter()
                    .find(|o| o.code as f64 == v)
                    .map(|o| o.code as f64)
                    .ok_or_else(|| ValidationError::UnknownCategory {
                        field: field.key,
                        value: n.to_string(),
                    })
            }
            _ => Err(ValidationError::WrongType {
                field: field.key,
                expected: "a category label",
            }),
        },
        ValueDomain::Derived => Err(ValidationError::DerivedField { field: field.key }),
    }
}

fn check_range(field: &ClinicalField, v: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if (min..=max).contains(&v) {
        Ok(v)
    } else {
        Err(ValidationError::OutOfRange {
            field: field.key,
            value: v,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{HeartDomain, SleepDomain};
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn heart_labels_map_to_codes() {
        let input = normalize::<HeartDomain>(&fixtures::heart_example()).unwrap();
        assert_eq!(input.get("sex"), Some(1.0));
        assert_eq!(input.get("chest_pain_type"), Some(0.0));
        assert_eq!(input.get("thalassemia"), Some(1.0));
        assert_eq!(input.get("st_slope"), Some(1.0));
        assert_eq!(
            input.features,
            vec![55.0, 1.0, 0.0, 130.0, 250.0, 1.0, 0.0, 150.0, 1.0, 1.2, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn categorical_accepts_numeric_code() {
        let mut raw = fixtures::heart_example();
        raw.insert("thalassemia".into(), json!(3));
        let input = normalize::<HeartDomain>(&raw).unwrap();
        assert_eq!(input.get("thalassemia"), Some(3.0));

        raw.insert("thalassemia".into(), json!(0));
        let err = normalize::<HeartDomain>(&raw).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory { field: "thalassemia", .. }));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let mut raw = fixtures::heart_example();
        raw.insert("sex".into(), json!("male"));
        assert_eq!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::UnknownCategory { field: "sex", value: "male".into() }
        );
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut raw = fixtures::heart_example();
        raw.remove("cholesterol");
        assert_eq!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::MissingField { field: "cholesterol" }
        );
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut raw = fixtures::heart_example();
        raw.insert("cholesterol".into(), json!(601));
        assert!(matches!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::OutOfRange { field: "cholesterol", .. }
        ));

        raw.insert("cholesterol".into(), json!(600));
        assert!(normalize::<HeartDomain>(&raw).is_ok());
    }

    #[test]
    fn fractional_integer_is_rejected() {
        let mut raw = fixtures::heart_example();
        raw.insert("age".into(), json!(55.5));
        assert_eq!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::NotInteger { field: "age", value: 55.5 }
        );
        raw.insert("age".into(), json!(55.0));
        assert!(normalize::<HeartDomain>(&raw).is_ok());
    }

    #[test]
    fn wrong_json_type_is_rejected() {
        let mut raw = fixtures::heart_example();
        raw.insert("cholesterol".into(), json!("250"));
        assert!(matches!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::WrongType { field: "cholesterol", .. }
        ));

        let mut raw = fixtures::heart_example();
        raw.insert("sex".into(), json!(true));
        assert!(matches!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::WrongType { field: "sex", .. }
        ));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut raw = fixtures::heart_example();
        raw.insert("smoker".into(), json!("Ya"));
        assert_eq!(
            normalize::<HeartDomain>(&raw).unwrap_err(),
            ValidationError::UnknownField { field: "smoker".into() }
        );
    }

    #[test]
    fn sleep_bmi_is_derived_and_not_a_feature() {
        let input = normalize::<SleepDomain>(&fixtures::sleep_example()).unwrap();
        let bmi = input.get("bmi").unwrap();
        assert!((bmi - 22.4913).abs() < 1e-4);
        assert_eq!(input.features.len(), 11);
        assert_eq!(input.features[3], 4.0);
    }

    #[test]
    fn derived_field_cannot_be_supplied() {
        let mut raw = fixtures::sleep_example();
        raw.insert("bmi".into(), json!(21.0));
        assert_eq!(
            normalize::<SleepDomain>(&raw).unwrap_err(),
            ValidationError::DerivedField { field: "bmi" }
        );
    }
}
