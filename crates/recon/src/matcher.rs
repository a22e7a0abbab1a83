use std::collections::BTreeSet;

use crate::model::{FieldMatches, FieldTokens};

/// Tokens that occur verbatim (case-sensitive) somewhere in `blob`.
pub fn match_tokens(tokens: &BTreeSet<String>, blob: &str) -> BTreeSet<String> {
    tokens
        .iter()
        .filter(|token| blob.contains(token.as_str()))
        .cloned()
        .collect()
}

/// Match one field's tokens. Fields never influence each other.
pub fn match_field(field: &FieldTokens, blob: &str) -> FieldMatches {
    FieldMatches {
        field: field.field.clone(),
        weight: field.weight,
        token_count: field.tokens.len(),
        matched: match_tokens(&field.tokens, blob),
    }
}
