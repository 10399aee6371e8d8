use serde::Serialize;

/// One display label and the numeric code the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryOption {
    pub label: &'static str,
    pub code: i64,
}

/// Accepted values for a clinical field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueDomain {
    /// Any finite number within `min..=max`.
    Numeric { min: f64, max: f64 },
    /// Whole numbers within `min..=max`.
    Integer { min: i64, max: i64 },
    /// One of a fixed set of labelled codes.
    Categorical { options: &'static [CategoryOption] },
    /// Computed from other fields, never supplied by the caller.
    Derived,
}

impl ValueDomain {
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Derived)
    }

    /// Code for a display label (exact match after trimming).
    pub fn code_for_label(&self, label: &str) -> Option<i64> {
        match self {
            Self::Categorical { options } => options
                .iter()
                .find(|o| o.label == label.trim())
                .map(|o| o.code),
            _ => None,
        }
    }

    /// Display label for a code, if this is a categorical domain.
    pub fn label_for_code(&self, code: i64) -> Option<&'static str> {
        match self {
            Self::Categorical { options } => {
                options.iter().find(|o| o.code == code).map(|o| o.label)
            }
            _ => None,
        }
    }
}

/// An observable clinical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClinicalField {
    pub key: &'static str,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub domain: ValueDomain,
}

impl ClinicalField {
    pub const fn numeric(
        key: &'static str,
        display_name: &'static str,
        unit: &'static str,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            key,
            display_name,
            unit,
            domain: ValueDomain::Numeric { min, max },
        }
    }

    pub const fn integer(
        key: &'static str,
        display_name: &'static str,
        unit: &'static str,
        min: i64,
        max: i64,
    ) -> Self {
        Self {
            key,
            display_name,
            unit,
            domain: ValueDomain::Integer { min, max },
        }
    }

    pub const fn categorical(
        key: &'static str,
        display_name: &'static str,
        options: &'static [CategoryOption],
    ) -> Self {
        Self {
            key,
            display_name,
            unit: "",
            domain: ValueDomain::Categorical { options },
        }
    }

    pub const fn derived(key: &'static str, display_name: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            display_name,
            unit,
            domain: ValueDomain::Derived,
        }
    }
}

/// Clinical normal range for a field. A missing bound means no numeric
/// threshold applies (e.g. age).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalRange {
    pub field: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Compare after rounding to this many decimals (BMI is shown at one).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
}

impl NormalRange {
    pub const fn bounded(field: &'static str, min: f64, max: f64) -> Self {
        Self {
            field,
            min: Some(min),
            max: Some(max),
            decimals: None,
        }
    }

    pub const fn unbounded(field: &'static str) -> Self {
        Self {
            field,
            min: None,
            max: None,
            decimals: None,
        }
    }

    pub const fn rounded(self, decimals: u32) -> Self {
        Self {
            decimals: Some(decimals),
            ..self
        }
    }
}
