//! XLSX writer

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use sheetfill_core::{CellAddress, CellValue, Workbook, Worksheet};

const MINIMAL_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path, replacing any existing file
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        log::debug!("writing workbook to {}", path.display());
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write(workbook, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a workbook to an in-memory XLSX document
    pub fn write_bytes(workbook: &Workbook) -> XlsxResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write(workbook, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;

        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(MINIMAL_STYLES.as_bytes())?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            Self::write_worksheet(&mut zip, sheet, i)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
            workbook.sheet_count() + 1
        ));

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(&format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if let Some((r0, c0, r1, c1)) = sheet.used_bounds() {
            content.push_str(&format!(
                "\n    <dimension ref=\"{}:{}\"/>",
                CellAddress::new(r0, c0),
                CellAddress::new(r1, c1)
            ));
        }

        content.push_str("\n    <sheetData>");

        // Empty rows and blank cells are written too
        for row in sheet.rows() {
            if row.is_empty() {
                content.push_str(&format!("\n        <row r=\"{}\"/>", row.index() + 1));
                continue;
            }

            content.push_str(&format!("\n        <row r=\"{}\">", row.index() + 1));
            for (col, cell) in row.cells() {
                let cell_ref = CellAddress::new(row.index(), col).to_a1_string();
                content.push_str("\n            ");
                write_cell(&mut content, &cell_ref, &cell.value);
            }
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Append one `<c>` element
fn write_cell(content: &mut String, cell_ref: &str, value: &CellValue) {
    match value {
        CellValue::Empty => {
            content.push_str(&format!("<c r=\"{}\"/>", cell_ref));
        }
        CellValue::Number(n) if n.is_finite() => {
            content.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", cell_ref, n));
        }
        // NaN and infinities have no representation in the format
        CellValue::Number(_) => {
            content.push_str(&format!("<c r=\"{}\" t=\"e\"><v>#NUM!</v></c>", cell_ref));
        }
        CellValue::String(s) => {
            content.push_str(&format!(
                "<c r=\"{}\" t=\"inlineStr\"><is>{}</is></c>",
                cell_ref,
                text_element(s.as_str())
            ));
        }
        CellValue::Boolean(b) => {
            content.push_str(&format!(
                "<c r=\"{}\" t=\"b\"><v>{}</v></c>",
                cell_ref,
                if *b { 1 } else { 0 }
            ));
        }
        CellValue::Error(e) => {
            content.push_str(&format!(
                "<c r=\"{}\" t=\"e\"><v>{}</v></c>",
                cell_ref,
                escape_xml(e.as_str())
            ));
        }
        CellValue::Formula { cached_value, .. } => {
            let formula = escape_xml(value.formula_source().unwrap_or_default());
            let (type_attr, cached) = match cached_value.as_deref() {
                Some(CellValue::Number(n)) if n.is_finite() => ("", format!("<v>{}</v>", n)),
                Some(CellValue::String(s)) => {
                    (" t=\"str\"", format!("<v>{}</v>", escape_text(s.as_str())))
                }
                Some(CellValue::Boolean(b)) => {
                    (" t=\"b\"", format!("<v>{}</v>", if *b { 1 } else { 0 }))
                }
                Some(CellValue::Error(e)) => (" t=\"e\"", format!("<v>{}</v>", e.as_str())),
                _ => ("", String::new()),
            };
            content.push_str(&format!(
                "<c r=\"{}\"{}><f>{}</f>{}</c>",
                cell_ref, type_attr, formula, cached
            ));
        }
    }
}

/// A `<t>` element, preserving leading and trailing whitespace
fn text_element(s: &str) -> String {
    if s.trim() != s {
        format!("<t xml:space=\"preserve\">{}</t>", escape_text(s))
    } else {
        format!("<t>{}</t>", escape_text(s))
    }
}

/// Cell text as element content, in the form the reader decodes
fn escape_text(s: &str) -> String {
    escape_xml(&encode_excel_escapes(s))
}

/// Encode text with Excel's `_xHHHH_` escapes.
///
/// Control characters other than tab, LF and CR cannot appear in XML and
/// are written as `_xHHHH_`. The `_` of text that already looks like an
/// escape is written as `_x005F_` so it reads back literally.
fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '_' if looks_like_escape(&s[i..]) => result.push_str("_x005F_"),
            '\t' | '\n' | '\r' => result.push(c),
            c if c < ' ' => result.push_str(&format!("_x{:04X}_", u32::from(c))),
            c => result.push(c),
        }
    }
    result
}

/// `s` starts with `_x`, four hex digits and `_`
fn looks_like_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7 && b[1] == b'x' && b[2..6].iter().all(u8::is_ascii_hexdigit) && b[6] == b'_'
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
