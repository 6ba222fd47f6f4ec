//! Named transformer catalog.
//!
//! Maps short keys to transformers with a one-line description. Composite
//! entries are built from entries that already exist, so primitives are
//! registered first.

use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::sort::{sort_lines_i_stage, sort_paragraphs_i_stage};
use crate::stage::Transformer;
use crate::transform::{
    convert_line_terminators_stage, ensure_final_lf_stage, trim_leading_empty_lines_stage,
    trim_trailing_empty_lines_stage, trim_trailing_white_space_stage,
};

/// Keys chained, in order, by the `norm` entry.
pub const NORM_CHAIN: [&str; 4] = ["lf", "trail", "trimlf", "nelf"];

/// A catalog entry: a transformer and its description.
#[derive(Debug, Clone)]
pub struct Entry {
    pub transformer: Transformer,
    pub doc: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, Entry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard entries: `lf`, `trail`, `trimlf`, `nelf`, `sortli`,
    /// `sortpi` and the `norm` composite.
    pub fn standard() -> Self {
        let lf = Transformer::stage(convert_line_terminators_stage);
        let trail = Transformer::stage(trim_trailing_white_space_stage);
        let trimlf = Transformer::chain([
            Transformer::stage(trim_leading_empty_lines_stage),
            Transformer::stage(trim_trailing_empty_lines_stage),
        ]);
        let nelf = Transformer::stage(ensure_final_lf_stage);
        // Same order as NORM_CHAIN.
        let norm = Transformer::chain([lf.clone(), trail.clone(), trimlf.clone(), nelf.clone()]);

        let mut catalog = Self::new();
        catalog.insert("lf", lf, "Convert line terminators to LF");
        catalog.insert("trail", trail, "Remove trailing whitespace (LF end of line)");
        catalog.insert(
            "trimlf",
            trimlf,
            "Trim leading and trailing empty lines (LF end of line)",
        );
        catalog.insert("nelf", nelf, "Ensure non-empty content ends with LF");
        catalog.insert(
            "sortli",
            Transformer::stage(sort_lines_i_stage),
            "Sort lines case-insensitive (LF end of line)",
        );
        catalog.insert(
            "sortpi",
            Transformer::stage(sort_paragraphs_i_stage),
            "Sort paragraphs case-insensitive (LF end of line)",
        );
        catalog.insert("norm", norm, &format!("Normalize: {}", NORM_CHAIN.join(" ")));
        catalog
    }

    pub fn insert(&mut self, key: &str, transformer: Transformer, doc: &str) {
        self.entries.insert(
            key.to_string(),
            Entry {
                transformer,
                doc: doc.to_string(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Result<&Entry, CatalogError> {
        self.entries
            .get(key)
            .ok_or_else(|| CatalogError::UnknownKey(key.to_string()))
    }

    /// Chain the transformers named by `keys`, in order.
    ///
    /// Fails on the first unknown key.
    pub fn resolve<I, S>(&self, keys: I) -> Result<Transformer, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts = keys
            .into_iter()
            .map(|key| self.get(key.as_ref()).map(|entry| entry.transformer.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Transformer::chain(parts))
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// One `key<TAB>doc` line per entry, sorted by key.
    pub fn usage(&self) -> String {
        self.entries
            .iter()
            .map(|(key, entry)| format!("  {key}\t{}\n", entry.doc))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::read_runes;
    use crate::stream::drain_string;

    fn run_keys(keys: &[&str], input: &str) -> String {
        let catalog = Catalog::standard();
        let transformer = catalog.resolve(keys).unwrap();
        let (out, status) = drain_string(transformer.apply(read_runes(input.as_bytes())));
        assert!(status.is_ok());
        out
    }

    #[test]
    fn test_standard_keys_sorted() {
        let catalog = Catalog::standard();
        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(
            keys,
            vec!["lf", "nelf", "norm", "sortli", "sortpi", "trail", "trimlf"]
        );
    }

    #[test]
    fn test_unknown_key() {
        let catalog = Catalog::standard();
        let err = catalog.resolve(["lf", "bogus", "nope"]).unwrap_err();
        assert_eq!(err, CatalogError::UnknownKey("bogus".to_string()));
    }

    #[test]
    fn test_norm_doc_lists_chain() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.get("norm").unwrap().doc, "Normalize: lf trail trimlf nelf");
    }

    #[test]
    fn test_norm_matches_its_chain() {
        let input = "\r\n\n  keep  \r\n\tindented\t\r\r\n\n";
        let catalog = Catalog::standard();
        let norm = catalog.get("norm").unwrap();
        assert_eq!(norm.transformer.stage_count(), 5);
        assert_eq!(run_keys(&["norm"], input), run_keys(&NORM_CHAIN, input));
        assert_eq!(run_keys(&["norm"], input), "  keep\n\tindented\n");
    }

    #[test]
    fn test_norm_whitespace_only_input_is_empty() {
        assert_eq!(run_keys(&["norm"], " \t"), "");
    }

    #[test]
    fn test_norm_full() {
        assert_eq!(
            run_keys(&["norm"], "\r\n\r\n  title  \r\nbody\t\r\n\r\n\r\nend"),
            "  title\nbody\n\n\nend\n"
        );
    }

    #[test]
    fn test_trimlf() {
        assert_eq!(run_keys(&["trimlf"], "\n\na\n\nb\n\n\n"), "a\n\nb\n");
    }

    #[test]
    fn test_keys_compose_in_order() {
        assert_eq!(run_keys(&["lf", "sortli"], "b\r\nA\rc"), "A\nb\nc\n");
        assert_eq!(run_keys(&[], "as is\r"), "as is\r");
    }

    #[test]
    fn test_sortpi_entry() {
        assert_eq!(run_keys(&["sortpi"], "zz\n\nYy\nxx\n"), "Yy\nxx\n\nzz\n");
    }

    #[test]
    fn test_usage_lists_every_key() {
        let catalog = Catalog::standard();
        let usage = catalog.usage();
        for key in catalog.keys() {
            assert!(usage.contains(&format!("  {key}\t")), "missing {key}");
        }
    }
}
