use crate::error::MatchError;

/// Split a field request on `,` or `，` and trim each name.
///
/// An empty entry anywhere is an error. A name repeated later in the list
/// is dropped so each field yields exactly one result block.
pub fn parse_field_list(input: &str) -> Result<Vec<String>, MatchError> {
    let mut fields: Vec<String> = Vec::new();

    for (idx, part) in input.split([',', '，']).enumerate() {
        let name = part.trim();
        if name.is_empty() {
            return Err(MatchError::EmptyFieldName { position: idx + 1 });
        }
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }

    Ok(fields)
}
