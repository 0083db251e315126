use super::*;

impl Document {
    /// Get a typed value using dot notation.
    ///
    /// Both `snake_case` and `kebab-case` spellings of each segment are tried.
    ///
    /// # Examples
    /// ```no_run
    /// # use mangolo::parser::parse_document_file;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let doc = parse_document_file("app.mango")?;
    /// let host: String = doc.get("server.host")?;
    /// let port: u16 = doc.get("server.port")?;
    /// let name: String = doc.get("name")?; // [global]
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns a `TypeError` with code 304 if the path does not exist, or the
    /// conversion error if the value has the wrong type.
    pub fn get<T>(&self, path: &str) -> Result<T, MangoError>
    where
        T: TryFrom<Value, Error = MangoError>,
    {
        let value = self.get_value(path)?;
        T::try_from(value.clone()).map_err(|e| match e {
            MangoError::TypeError { message, hint, code } => MangoError::TypeError {
                message: format!("{} at '{}'", message, path),
                hint,
                code,
            },
            other => other,
        })
    }

    /// Like [`Document::get`], but a missing path yields `Ok(None)`.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, MangoError>
    where
        T: TryFrom<Value, Error = MangoError>,
    {
        match self.get(path) {
            Ok(value) => Ok(Some(value)),
            Err(MangoError::TypeError { code: Some(304), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value, falling back to `default` on any error.
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = MangoError>,
    {
        self.get(path).unwrap_or(default)
    }

    /// Borrow the raw value at `path`.
    pub fn get_value(&self, path: &str) -> Result<&Value, MangoError> {
        let (section, key, rest) = split_path(path);

        let mut current = lookup(&self.sections, section)
            .and_then(|entries| lookup(entries, key))
            .ok_or_else(|| not_found(path))?;

        for segment in rest {
            current = match current {
                Value::Object(entries) => lookup(entries, segment).ok_or_else(|| not_found(path))?,
                _ => return Err(not_found(path)),
            };
        }

        Ok(current)
    }

    /// Keys of a section, in file order.
    pub fn keys(&self, section: &str) -> Result<Vec<String>, MangoError> {
        lookup(&self.sections, section)
            .map(|entries| entries.keys().cloned().collect())
            .ok_or_else(|| MangoError::TypeError {
                message: format!("Section '{}' not found in document", section),
                hint: Some(format!("Available sections: {}", self.section_names().join(", "))),
                code: Some(306),
            })
    }

    pub fn has(&self, path: &str) -> bool {
        self.get_value(path).is_ok()
    }
}
