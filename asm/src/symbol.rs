use indexmap::IndexMap;

use crate::error::Error;
use crate::token::Location;

/// Label name to (definition site, byte offset in the image).
/// Insertion-ordered so dumps follow the source.
#[derive(Debug, Default)]
pub struct Symbols {
    map: IndexMap<String, (Location, u16)>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second definition of the same name is an error at the second
    /// definition's location.
    pub fn define(&mut self, name: String, at: u16, loc: Location) -> Result<(), Error> {
        if self.map.contains_key(&name) {
            return Err(Error::DuplicateLabel { name, loc });
        }
        self.map.insert(name, (loc, at));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.map.get(name).map(|(_, at)| *at)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.map.iter().map(|(name, (_, at))| (name.as_str(), *at))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One forward use of a not-yet-defined symbol: `at` addresses a 2-byte
/// zero placeholder already appended to the image, `loc` is the use site.
#[derive(Debug, Clone)]
pub struct Fixup {
    pub name: String,
    pub at: usize,
    pub loc: Location,
}

/// Rewrite every placeholder once the symbol table is frozen. The image
/// is only a valid instruction stream after this pass completes in full.
pub fn backpatch(image: &mut [u8], fixups: &[Fixup], symbols: &Symbols) -> Result<(), Error> {
    for fixup in fixups {
        let Some(value) = symbols.get(&fixup.name) else {
            return Err(Error::UndefinedSymbol {
                name: fixup.name.clone(),
                loc: fixup.loc.clone(),
            });
        };
        image[fixup.at..fixup.at + 2].copy_from_slice(&value.to_be_bytes());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(row: u32) -> Location {
        Location::new("test.s", row, 1)
    }

    #[test]
    fn duplicate_definition_reports_second_site() {
        let mut symbols = Symbols::new();
        symbols.define("a".into(), 0, loc(1)).unwrap();
        let err = symbols.define("a".into(), 4, loc(3)).unwrap_err();
        match err {
            Error::DuplicateLabel { name, loc } => {
                assert_eq!(name, "a");
                assert_eq!(loc.row, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn backpatch_overwrites_placeholders_big_endian() {
        let mut symbols = Symbols::new();
        symbols.define("target".into(), 0x0102, loc(5)).unwrap();
        let mut image = vec![15, 0, 0];
        let fixups = vec![Fixup {
            name: "target".into(),
            at: 1,
            loc: loc(1),
        }];
        backpatch(&mut image, &fixups, &symbols).unwrap();
        assert_eq!(image, vec![15, 1, 2]);
    }

    #[test]
    fn backpatch_fails_on_unknown_symbol() {
        let symbols = Symbols::new();
        let mut image = vec![15, 0, 0];
        let fixups = vec![Fixup {
            name: "nowhere".into(),
            at: 1,
            loc: loc(1),
        }];
        let err = backpatch(&mut image, &fixups, &symbols).unwrap_err();
        assert!(matches!(err, Error::UndefinedSymbol { name, .. } if name == "nowhere"));
    }
}
