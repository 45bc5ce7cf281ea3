//! Column 9 of GFF3 and GTF lines.
//!
//! The two dialects disagree on how a key is tied to its value: GFF3 writes
//! `ID=gene1;Parent=tx1` while GTF writes `gene_id "g1"; transcript_id "t1";`.
//! Each `;`-separated token is tried as GFF3 first and as GTF second, so a file
//! can mix both without being told which dialect it is.

/// GFF3 attribute linking a child feature to one or more parents
pub const PARENT: &str = "Parent";
/// GTF attribute naming the transcript an exon/CDS belongs to
pub const TRANSCRIPT_ID: &str = "transcript_id";
/// GFF3 attribute identifying a feature that children may refer to
pub const ID: &str = "ID";

///
/// Attribute key/value pairs of one line, in file order. A key may carry
/// several values when it is repeated.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, Vec<String>)>,
}

impl Attributes {
    ///
    /// Parse the attributes column.
    ///
    /// Returns the parsed attributes together with every token that matched
    /// neither dialect, so the caller can report them.
    ///
    pub fn parse(column: &str) -> (Attributes, Vec<String>) {
        let mut attributes = Attributes::default();
        let mut malformed = Vec::new();

        for token in column.split(';').map(|t| t.trim_matches(' ')) {
            if token.is_empty() {
                continue;
            }
            match split_token(token) {
                Some((key, value)) => attributes.push(key, value),
                None => malformed.push(token.to_string()),
            }
        }

        (attributes, malformed)
    }

    fn push(&mut self, key: &str, value: &str) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => self.pairs.push((key.to_string(), vec![value.to_string()])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value recorded for `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    ///
    /// Ids listed in the `Parent` attribute. GFF3 allows several parents
    /// separated by commas; each one becomes its own entry.
    ///
    pub fn parents(&self) -> Vec<&str> {
        self.first(PARENT)
            .map(|value| value.split(',').filter(|id| !id.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// Split one token as GFF3 `key=value`, falling back to GTF `key "value"`.
fn split_token(token: &str) -> Option<(&str, &str)> {
    if let Some(pair) = token.split_once('=') {
        return Some(pair);
    }

    let (key, rest) = token.split_once(" \"")?;
    if rest.is_empty() || rest.contains(" \"") {
        return None;
    }
    let value = rest.strip_suffix('"').unwrap_or(rest);
    Some((key, value))
}
