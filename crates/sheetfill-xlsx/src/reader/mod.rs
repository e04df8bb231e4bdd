//! XLSX reader
//!
//! Reads sheet names and cell values. Styles, comments and drawings are
//! ignored; a template's formatting is not carried into the model.
//!
//! Shared formulas are not expanded. The cell that carries the formula
//! text reads as a formula; the cells that only reference it through
//! `<f t="shared" si=".."/>` read as their cached value, so a formula text
//! search does not match them.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetfill_core::{CellAddress, CellError, CellValue, Workbook, Worksheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    result.push_str(rest);

    result
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// A `<c>` element being collected
#[derive(Debug, Default)]
struct PendingCell {
    row: u32,
    col: u16,
    cell_type: Option<String>,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<String>,
}

/// Where text events inside `<sheetData>` go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Formula,
    InlineText,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        log::debug!("reading workbook from {}", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from an in-memory XLSX document
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<Workbook> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                log::warn!("sheet '{}' has no worksheet relationship {}, skipped", name, r_id);
                continue;
            };
            let mut worksheet = Worksheet::new(name.as_str());
            Self::read_worksheet(&mut archive, path, &mut worksheet, &shared_strings)?;
            workbook.add_existing_worksheet(worksheet)?;
        }

        if workbook.is_empty() {
            workbook.add_worksheet()?;
        }

        log::debug!(
            "read {} sheet(s), {} shared string(s)",
            workbook.sheet_count(),
            shared_strings.len()
        );
        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs repeat the text as a reading guide
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        current.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in workbook order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths by rId
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to the xl/ folder unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet part into `worksheet`.
    ///
    /// Rows and cells present in the file are created even when they hold
    /// no value, so a template's blank layout survives a round trip.
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_row: u32 = 0;
        let mut next_col: u16 = 0;
        let mut pending: Option<PendingCell> = None;
        let mut target = TextTarget::None;
        let mut in_inline_str = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = Self::open_row(&e, current_row, worksheet)?;
                        next_col = 0;
                    }
                    b"c" => {
                        let (row, col) = Self::cell_position(&e, current_row, next_col)?;
                        next_col = col.saturating_add(1);
                        pending = Some(PendingCell {
                            row,
                            col,
                            cell_type: attr_value(&e, b"t"),
                            ..PendingCell::default()
                        });
                    }
                    b"v" if pending.is_some() => target = TextTarget::Value,
                    b"f" if pending.is_some() => target = TextTarget::Formula,
                    b"is" if pending.is_some() => in_inline_str = true,
                    b"rPh" if in_inline_str => target = TextTarget::None,
                    b"t" if in_inline_str => target = TextTarget::InlineText,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = Self::open_row(&e, current_row, worksheet)?;
                        current_row = current_row.saturating_add(1);
                        next_col = 0;
                    }
                    b"c" => {
                        let (row, col) = Self::cell_position(&e, current_row, next_col)?;
                        next_col = col.saturating_add(1);
                        worksheet.get_or_create_cell(row, col)?;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some(cell) = pending.as_mut() {
                        let text = e.unescape()?;
                        match target {
                            TextTarget::Value => {
                                cell.value.get_or_insert_with(String::new).push_str(&text)
                            }
                            TextTarget::Formula => {
                                cell.formula.get_or_insert_with(String::new).push_str(&text)
                            }
                            TextTarget::InlineText => {
                                cell.inline.get_or_insert_with(String::new).push_str(&text)
                            }
                            TextTarget::None => {}
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(cell) = pending.take() {
                            Self::process_cell(worksheet, cell, shared_strings)?;
                        }
                        in_inline_str = false;
                        target = TextTarget::None;
                    }
                    b"row" => {
                        current_row = current_row.saturating_add(1);
                    }
                    b"is" => in_inline_str = false,
                    b"v" | b"f" | b"t" => target = TextTarget::None,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Create the row named by a `<row>` element and return its index.
    ///
    /// Rows without an `r` attribute follow the previous one.
    fn open_row(e: &BytesStart, fallback: u32, worksheet: &mut Worksheet) -> XlsxResult<u32> {
        let index = match attr_value(e, b"r") {
            Some(r) => r
                .parse::<u32>()
                .ok()
                .filter(|r| *r >= 1)
                .map(|r| r - 1)
                .ok_or_else(|| XlsxError::Parse(format!("Invalid row number '{}'", r)))?,
            None => fallback,
        };
        worksheet.get_or_create_row(index)?;
        Ok(index)
    }

    /// Position of a `<c>` element; cells without `r` follow the previous one
    fn cell_position(e: &BytesStart, row: u32, next_col: u16) -> XlsxResult<(u32, u16)> {
        match attr_value(e, b"r") {
            Some(cell_ref) => {
                let addr = CellAddress::parse(&cell_ref).map_err(|err| {
                    XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
                })?;
                Ok((addr.row, addr.col))
            }
            None => Ok((row, next_col)),
        }
    }

    fn process_cell(
        worksheet: &mut Worksheet,
        cell: PendingCell,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let cell_type = cell.cell_type.as_deref();
        let text = cell.inline.or(cell.value);

        let value = match (cell.formula, text) {
            (Some(formula), cached) => {
                let cached = cached
                    .map(|v| Self::typed_value(cell_type, &v, shared_strings))
                    .transpose()?;
                CellValue::formula_with_cached(formula, cached)
            }
            (None, Some(v)) => Self::typed_value(cell_type, &v, shared_strings)?,
            (None, None) => CellValue::Empty,
        };

        worksheet.set_cell_value_at(cell.row, cell.col, value)?;
        Ok(())
    }

    /// Interpret a cell's text according to its `t` attribute
    fn typed_value(
        cell_type: Option<&str>,
        value: &str,
        shared_strings: &[String],
    ) -> XlsxResult<CellValue> {
        Ok(match cell_type {
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::string(s.as_str())
            }
            Some("b") => {
                let v = value.trim();
                CellValue::Boolean(v == "1" || v.eq_ignore_ascii_case("true"))
            }
            Some("e") => CellError::parse(value.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(value)),
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },
            Some(_) => CellValue::string(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;
    const ROOT_RELS: &[u8] = br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    const WORKBOOK: &[u8] = br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="One" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
    const WORKBOOK_RELS: &[u8] = br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    /// Build a one-sheet package around the given sheet and shared strings XML
    fn package(sheet_xml: &str, shared_strings: Option<&str>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(CONTENT_TYPES).unwrap();
            zip.start_file("_rels/.rels", options).unwrap();
            zip.write_all(ROOT_RELS).unwrap();
            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(WORKBOOK).unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options)
                .unwrap();
            zip.write_all(WORKBOOK_RELS).unwrap();
            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(sheet_xml.as_bytes()).unwrap();
            if let Some(sst) = shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("_x000A_"), "\n");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("a_xzz_b"), "a_xzz_b");
    }

    #[test]
    fn test_read_empty_sheet() {
        let bytes = package(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#,
            None,
        );
        let workbook = XlsxReader::read_bytes(&bytes).unwrap();

        assert_eq!(workbook.sheet_count(), 1);
        assert_eq!(workbook.worksheet(0).unwrap().name(), "One");
        assert!(workbook.worksheet(0).unwrap().is_empty());
    }

    #[test]
    fn test_read_typed_cells() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>42.5</v></c><c r="C1" t="b"><v>1</v></c></row>
<row r="3"><c r="A3" t="e"><v>#DIV/0!</v></c><c r="B3"><f>SUM(B1:B2)</f><v>42.5</v></c><c r="C3" t="inlineStr"><is><t xml:space="preserve"> padded </t></is></c></row>
</sheetData></worksheet>"#;
        let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="1" uniqueCount="1"><si><t>TARGET</t></si></sst>"#;

        let workbook = XlsxReader::read_bytes(&package(sheet, Some(sst))).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.get_value_at(0, 0), CellValue::string("TARGET"));
        assert_eq!(ws.get_value_at(0, 1), CellValue::Number(42.5));
        assert_eq!(ws.get_value_at(0, 2), CellValue::Boolean(true));
        assert_eq!(ws.get_value_at(2, 0), CellValue::Error(CellError::Div0));
        assert_eq!(
            ws.get_value_at(2, 1),
            CellValue::Formula {
                text: "=SUM(B1:B2)".into(),
                cached_value: Some(Box::new(CellValue::Number(42.5))),
            }
        );
        assert_eq!(ws.get_value_at(2, 2), CellValue::string(" padded "));
        assert!(ws.row(1).is_none());
    }

    #[test]
    fn test_shared_formula_dependents_read_as_cached_value() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="B1"><f t="shared" ref="B1:B2" si="0">A1*2</f><v>4</v></c></row>
<row r="2"><c r="B2"><f t="shared" si="0"/><v>6</v></c></row>
</sheetData></worksheet>"#;

        let workbook = XlsxReader::read_bytes(&package(sheet, None)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(
            ws.get_value_at(0, 1),
            CellValue::formula_with_cached("A1*2", Some(CellValue::Number(4.0)))
        );
        assert_eq!(ws.get_value_at(1, 1), CellValue::Number(6.0));
    }

    #[test]
    fn test_read_rich_text_shared_string() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row></sheetData></worksheet>"#;
        let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><r><t>Hello</t></r><r><t xml:space="preserve"> World</t></r></si></sst>"#;

        let workbook = XlsxReader::read_bytes(&package(sheet, Some(sst))).unwrap();
        assert_eq!(
            workbook.worksheet(0).unwrap().get_value_at(0, 0),
            CellValue::string("Hello World")
        );
    }

    #[test]
    fn test_blank_rows_and_cells_are_kept() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="2"/><row r="4"><c r="D4" s="1"/></row></sheetData></worksheet>"#;

        let workbook = XlsxReader::read_bytes(&package(sheet, None)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert!(ws.row(1).is_some());
        assert!(ws.cell_at(3, 3).unwrap().is_empty());
        assert_eq!(ws.last_row_index(), Some(3));
    }

    #[test]
    fn test_cells_without_reference_follow_previous() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row><c><v>1</v></c><c><v>2</v></c></row><row><c r="B2"><v>3</v></c><c><v>4</v></c></row></sheetData></worksheet>"#;

        let workbook = XlsxReader::read_bytes(&package(sheet, None)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.get_value_at(0, 0), CellValue::Number(1.0));
        assert_eq!(ws.get_value_at(0, 1), CellValue::Number(2.0));
        assert_eq!(ws.get_value_at(1, 1), CellValue::Number(3.0));
        assert_eq!(ws.get_value_at(1, 2), CellValue::Number(4.0));
    }

    #[test]
    fn test_bad_shared_string_index() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>3</v></c></row></sheetData></worksheet>"#;
        let err = XlsxReader::read_bytes(&package(sheet, None)).unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = XlsxReader::read_bytes(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, XlsxError::Zip(_)));
    }
}
