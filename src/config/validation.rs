use super::*;

impl Document {
    /// Get a typed value and check it with `validator`; `valid_values` describes
    /// what was expected and ends up in the error.
    pub fn get_validated<T, F>(&self, path: &str, validator: F, valid_values: &str) -> Result<T, MangoError>
    where
        T: TryFrom<Value, Error = MangoError>,
        F: FnOnce(&T) -> bool,
    {
        let typed_value: T = self.get(path)?;

        if !validator(&typed_value) {
            return Err(MangoError::TypeError {
                message: format!("Invalid value for `{}`, expected: {}", path, valid_values),
                hint: Some(format!("Valid values are: {}", valid_values)),
                code: Some(450),
            });
        }

        Ok(typed_value)
    }

    /// Get a string and check it is one of `allowed_values` (case-insensitive).
    pub fn get_string_enum(&self, path: &str, allowed_values: &[&str]) -> Result<String, MangoError> {
        let value: String = self.get(path)?;

        if !allowed_values.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
            return Err(MangoError::TypeError {
                message: format!("Invalid value '{}' for `{}`", value, path),
                hint: Some(format!("Expected one of: {}", allowed_values.join(", "))),
                code: Some(451),
            });
        }

        Ok(value)
    }
}
