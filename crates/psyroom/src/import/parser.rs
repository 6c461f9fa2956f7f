use std::io::Read;

/// One respondent's answer cells, positions preserved.
#[derive(Debug)]
pub(crate) struct SheetRow {
    pub(crate) line: u64,
    pub(crate) respondent: String,
    pub(crate) cells: Vec<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<SheetRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let mut fields = record.iter();
        let respondent = fields.next().unwrap_or_default().to_string();
        let mut cells: Vec<String> = fields.map(str::to_string).collect();

        while cells.last().is_some_and(|cell| cell.is_empty()) {
            cells.pop();
        }

        rows.push(SheetRow {
            line,
            respondent,
            cells,
        });
    }

    Ok(rows)
}
