use std::fmt;

use crate::options::{OptionSet, OptionValue, key};
use crate::store::Presets;

/// Cell content for a boolean flag that is switched on.
pub const MARKER: &str = "x";

struct Column {
    header: &'static str,
    /// `None` for the preset name itself.
    key: Option<&'static str>,
    /// Show the marker when the flag is off instead of on.
    inverted: bool,
}

impl Column {
    const fn name(header: &'static str) -> Self {
        Self {
            header,
            key: None,
            inverted: false,
        }
    }

    const fn flag(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key: Some(key),
            inverted: false,
        }
    }

    const fn inverse(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key: Some(key),
            inverted: true,
        }
    }

    fn cell(&self, name: &str, options: &OptionSet) -> String {
        match self.key {
            None => name.to_string(),
            Some(key) => sign(options.get(key), self.inverted),
        }
    }
}

static COLUMNS: [Column; 15] = [
    Column::name("Preset"),
    Column::flag("User", key::USER),
    Column::inverse("Wiki List", key::COURSEWARE),
    Column::flag("Courseware", key::COURSEWARE),
    Column::flag("HQ Video", key::HIGH_QUALITY),
    Column::flag("CC", key::CLOSED_CAPTIONS),
    Column::flag("Seq Order", key::COURSE_ORDER),
    Column::flag("Dump List", key::DUMP_LIST),
    Column::flag("Handouts", key::HANDOUTS),
    Column::flag("UnZip", key::UNZIP),
    Column::flag("Debug", key::VERBOSE),
    Column::flag("PY NCC", key::NO_CHECK_CERT),
    Column::flag("PY", key::PYTHON),
    Column::flag("Proxy", key::PROXY),
    Column::flag("Proxy Test", key::PROXY_TEST),
];

/// Render one flag value. Booleans become the marker, anything else is shown
/// as-is; a missing or falsy value counts as "off".
fn sign(value: Option<&OptionValue>, inverted: bool) -> String {
    match value {
        Some(OptionValue::Flag(on)) if *on != inverted => MARKER.to_string(),
        Some(OptionValue::Flag(_)) => String::new(),
        Some(v) if v.is_truthy() => v.to_string(),
        _ if inverted => MARKER.to_string(),
        _ => String::new(),
    }
}

/// Summary table of every saved preset.
///
/// Columns that are blank for every preset are left out; the `Preset` column
/// is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Catalog {
    pub fn build(presets: &Presets) -> Self {
        let full: Vec<Vec<String>> = presets
            .iter()
            .map(|(name, options)| {
                COLUMNS
                    .iter()
                    .map(|column| column.cell(name, options))
                    .collect()
            })
            .collect();

        let keep: Vec<bool> = COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| {
                column.key.is_none() || full.iter().any(|row| !row[i].is_empty())
            })
            .collect();

        let headers = COLUMNS
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|(column, _)| column.header)
            .collect();

        let rows = full
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&keep)
                    .filter(|(_, keep)| **keep)
                    .map(|(cell, _)| cell)
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[&'static str] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        self.headers()
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows()
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn write_line<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    cells: &[S],
    widths: &[usize],
) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        write_line(f, self.headers(), &widths)?;
        write_line(f, &rule[..], &widths)?;
        for row in self.rows() {
            write_line(f, &row[..], &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(pairs: &[(&str, OptionValue)]) -> OptionSet {
        pairs.iter().cloned().collect()
    }

    fn column<'a>(catalog: &'a Catalog, header: &str) -> Option<Vec<&'a str>> {
        let i = catalog.headers().iter().position(|h| *h == header)?;
        Some(catalog.rows().iter().map(|row| row[i].as_str()).collect())
    }

    #[test]
    fn test_column_kept_when_any_preset_sets_it() {
        let mut presets = Presets::new();
        presets.insert("a".into(), preset(&[("hq", true.into())]));
        presets.insert("b".into(), preset(&[("hq", false.into())]));
        presets.insert("c".into(), preset(&[]));

        let catalog = Catalog::build(&presets);

        assert_eq!(column(&catalog, "HQ Video"), Some(vec![MARKER, "", ""]));
    }

    #[test]
    fn test_column_dropped_when_no_preset_sets_it() {
        let mut presets = Presets::new();
        presets.insert("a".into(), preset(&[("uz", false.into()), ("hq", true.into())]));
        presets.insert("b".into(), preset(&[("cc", true.into())]));

        let catalog = Catalog::build(&presets);

        assert!(column(&catalog, "UnZip").is_none());
        assert!(column(&catalog, "Debug").is_none());
        assert!(column(&catalog, "HQ Video").is_some());
        assert!(column(&catalog, "CC").is_some());
        for row in catalog.rows() {
            assert_eq!(row.len(), catalog.headers().len());
        }
    }

    #[test]
    fn test_wiki_list_is_inverse_of_courseware() {
        let mut presets = Presets::new();
        presets.insert("cw".into(), preset(&[("cw", true.into())]));
        presets.insert("wiki".into(), preset(&[("cw", false.into())]));
        presets.insert("bare".into(), preset(&[]));

        let catalog = Catalog::build(&presets);

        // BTreeMap order: bare, cw, wiki
        assert_eq!(column(&catalog, "Wiki List"), Some(vec![MARKER, "", MARKER]));
        assert_eq!(column(&catalog, "Courseware"), Some(vec!["", MARKER, ""]));
    }

    #[test]
    fn test_text_values_are_shown_literally() {
        let mut presets = Presets::new();
        presets.insert(
            "work".into(),
            preset(&[
                ("u", "a@b.com".into()),
                ("proxy", "http://10.0.0.1:3128".into()),
                ("py", "".into()),
            ]),
        );

        let catalog = Catalog::build(&presets);

        assert_eq!(column(&catalog, "Preset"), Some(vec!["work"]));
        assert_eq!(column(&catalog, "User"), Some(vec!["a@b.com"]));
        assert_eq!(column(&catalog, "Proxy"), Some(vec!["http://10.0.0.1:3128"]));
        assert!(column(&catalog, "PY").is_none());
    }

    #[test]
    fn test_empty_store_keeps_only_preset_header() {
        let catalog = Catalog::build(&Presets::new());

        assert_eq!(catalog.headers(), ["Preset"]);
        assert!(catalog.rows().is_empty());
        assert_eq!(catalog.to_string(), "Preset\n------\n");
    }

    #[test]
    fn test_renders_padded_columns() {
        let mut presets = Presets::new();
        presets.insert("work".into(), preset(&[("hq", true.into()), ("cw", true.into())]));
        presets.insert("home".into(), preset(&[("cw", false.into())]));

        let rendered = Catalog::build(&presets).to_string();

        let expected = "\
Preset  Wiki List  Courseware  HQ Video
------  ---------  ----------  --------
home    x
work               x           x
";
        assert_eq!(rendered, expected);
    }
}
