/// Declared type of a template parameter.
///
/// `String` and `Number` are the open text format's primitive types; the
/// remaining variants are the orchestrator's opaque reference types, carried
/// as typed variants here and rendered to their type string at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    String,
    Number,
    ImageId,
    SubnetId,
    KeyPairName,
}

impl ParameterType {
    pub fn type_string(&self) -> &'static str {
        match self {
            ParameterType::String => "String",
            ParameterType::Number => "Number",
            ParameterType::ImageId => "AWS::EC2::Image::Id",
            ParameterType::SubnetId => "AWS::EC2::Subnet::Id",
            ParameterType::KeyPairName => "AWS::EC2::KeyPair::KeyName",
        }
    }
}

/// Typed, validated input declared by the template.
///
/// Constraints are declarative: they are encoded into the output document for
/// the orchestrator to enforce at instantiation time, never checked during
/// synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub parameter_type: ParameterType,

    /// Enumerated allowed values. Empty means unconstrained.
    pub allowed_values: Vec<String>,

    /// Inclusive numeric range, only meaningful for `Number` parameters.
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,

    /// Regex pattern constraint for string parameters.
    pub allowed_pattern: Option<String>,

    pub default: Option<String>,
}

impl Parameter {
    pub fn new(name: &str, parameter_type: ParameterType) -> Self {
        Parameter {
            name: name.to_string(),
            parameter_type,
            allowed_values: Vec::new(),
            min_value: None,
            max_value: None,
            allowed_pattern: None,
            default: None,
        }
    }

    /// A string parameter constrained to an enumerated value set.
    pub fn enumerated(name: &str, allowed_values: &[&str]) -> Self {
        Parameter {
            allowed_values: allowed_values.iter().map(|v| v.to_string()).collect(),
            ..Parameter::new(name, ParameterType::String)
        }
    }

    /// A number parameter constrained to an inclusive range.
    pub fn number_in_range(name: &str, min_value: i64, max_value: i64) -> Self {
        Parameter {
            min_value: Some(min_value),
            max_value: Some(max_value),
            ..Parameter::new(name, ParameterType::Number)
        }
    }

    /// A `True`/`False` string parameter with a genuine boolean default.
    ///
    /// The synthesis layer works with `bool`; the external string convention
    /// only exists here and at the render boundary.
    pub fn boolean_flag(name: &str, default: bool) -> Self {
        Parameter {
            allowed_values: vec!["True".to_string(), "False".to_string()],
            default: Some(bool_string(default).to_string()),
            ..Parameter::new(name, ParameterType::String)
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.allowed_pattern = Some(pattern.to_string());
        self
    }
}

/// External string convention for boolean parameter values.
pub fn bool_string(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_flag_serializes_default_as_string() {
        let flag = Parameter::boolean_flag("UseCacheDisk", true);
        assert_eq!(flag.default.as_deref(), Some("True"));
        assert_eq!(flag.allowed_values, vec!["True", "False"]);
        assert_eq!(flag.parameter_type, ParameterType::String);
    }

    #[test]
    fn test_number_range_is_inclusive_bounds() {
        let size = Parameter::number_in_range("RaidDiskSize", 8, 4069);
        assert_eq!(size.min_value, Some(8));
        assert_eq!(size.max_value, Some(4069));
    }

    #[test]
    fn test_opaque_reference_type_strings() {
        assert_eq!(ParameterType::ImageId.type_string(), "AWS::EC2::Image::Id");
        assert_eq!(ParameterType::KeyPairName.type_string(), "AWS::EC2::KeyPair::KeyName");
    }
}
