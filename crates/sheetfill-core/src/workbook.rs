//! Workbook: an ordered list of named worksheets

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters Excel rejects in sheet names
const FORBIDDEN_NAME_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// A spreadsheet document.
///
/// Sheets keep the order they were added in. Names are unique ignoring
/// case, and every lookup by name ignores case as well, so `"Report"` and
/// `"REPORT"` refer to the same sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Name of the sheet in a new workbook
    pub const DEFAULT_SHEET_NAME: &'static str = "Sheet1";

    /// A workbook holding one empty sheet named [`Self::DEFAULT_SHEET_NAME`]
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new(Self::DEFAULT_SHEET_NAME)],
        }
    }

    /// A workbook with no sheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Sheet at `index` in workbook order
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Sheet called `name`, ignoring case
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        let index = self.sheet_index(name)?;
        self.worksheets.get(index)
    }

    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        let index = self.sheet_index(name)?;
        self.worksheets.get_mut(index)
    }

    /// Position of the sheet called `name`, ignoring case
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets
            .iter()
            .position(|ws| same_sheet_name(ws.name(), name))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(Worksheet::name).collect()
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Append an empty sheet named `SheetN`, with N the first free number
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = (self.worksheets.len() + 1..)
            .map(|n| format!("Sheet{}", n))
            .find(|name| self.sheet_index(name).is_none())
            .ok_or_else(|| Error::InvalidSheetName("no free sheet name".into()))?;
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Append an empty sheet called `name`
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Append `worksheet`, returning its index.
    ///
    /// Fails if the name is invalid or already taken.
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        check_sheet_name(worksheet.name())?;
        if self.sheet_index(worksheet.name()).is_some() {
            return Err(Error::DuplicateSheetName(worksheet.name().to_string()));
        }
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    /// Sheet called `name`, appended first when the workbook has none
    pub fn get_or_create_worksheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        let index = match self.sheet_index(name) {
            Some(index) => index,
            None => self.add_worksheet_with_name(name)?,
        };
        Ok(&mut self.worksheets[index])
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

fn same_sheet_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Reject names Excel would refuse to open
fn check_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("name is empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "'{}' is longer than {} characters",
            name, MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "'{}' contains '{}'",
            name, c
        )));
    }
    Ok(())
}
