use serde::Serialize;

use super::DatasetError;

/// Canonical booking fields the rest of the crate addresses by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ListingName,
    Channel,
    CheckIn,
    CheckOut,
    Nights,
    InvoiceTotal,
    CompanyCommission,
    CleaningFee,
}

/// One row of the raw -> canonical column mapping.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    pub field: Field,
    pub canonical: &'static str,
    /// Accepted spreadsheet headers, first match wins
    pub sources: &'static [&'static str],
    pub required: bool,
}

pub const COLUMN_MAP: &[ColumnMapping] = &[
    ColumnMapping {
        field: Field::ListingName,
        canonical: "Listing Name",
        sources: &["Nome interno do anúncio", "Listing Name"],
        required: true,
    },
    ColumnMapping {
        field: Field::Channel,
        canonical: "Channel",
        sources: &["Canal", "Channel"],
        required: false,
    },
    ColumnMapping {
        field: Field::CheckIn,
        canonical: "Check-In",
        sources: &["Chegada", "Check-In"],
        required: true,
    },
    ColumnMapping {
        field: Field::CheckOut,
        canonical: "Check-Out",
        sources: &["Data de checkout", "Check-Out"],
        required: true,
    },
    ColumnMapping {
        field: Field::Nights,
        canonical: "Nights",
        sources: &["Número de noites", "Nights"],
        required: true,
    },
    ColumnMapping {
        field: Field::InvoiceTotal,
        canonical: "Invoice Total",
        sources: &["Total da fatura de hospedagem", "Invoice Total"],
        required: true,
    },
    ColumnMapping {
        field: Field::CompanyCommission,
        canonical: "Company Commission",
        sources: &["Comissão da empresa", "Company Commission"],
        required: true,
    },
    ColumnMapping {
        field: Field::CleaningFee,
        canonical: "Cleaning Fee",
        sources: &["Taxas: Taxa de Limpeza", "Cleaning Fee"],
        required: true,
    },
];

/// How a canonical field was found in a particular spreadsheet.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedColumn {
    pub field: Field,
    pub canonical: &'static str,
    /// Header actually present in the sheet, `None` for an absent optional column
    pub source: Option<String>,
    pub position: Option<usize>,
}

/// Column positions for every canonical field of one sheet.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    columns: Vec<ResolvedColumn>,
}

impl ColumnIndex {
    /// Match sheet headers against [`COLUMN_MAP`]. Headers are compared after trimming.
    pub fn resolve(headers: &[String]) -> Result<Self, DatasetError> {
        let mut columns = Vec::with_capacity(COLUMN_MAP.len());

        for mapping in COLUMN_MAP {
            let found = mapping.sources.iter().find_map(|source| {
                headers
                    .iter()
                    .position(|h| h.trim() == *source)
                    .map(|pos| (pos, headers[pos].trim().to_string()))
            });

            match found {
                Some((position, source)) => columns.push(ResolvedColumn {
                    field: mapping.field,
                    canonical: mapping.canonical,
                    source: Some(source),
                    position: Some(position),
                }),
                None if mapping.required => {
                    return Err(DatasetError::MissingColumn(mapping.sources[0]));
                }
                None => columns.push(ResolvedColumn {
                    field: mapping.field,
                    canonical: mapping.canonical,
                    source: None,
                    position: None,
                }),
            }
        }

        Ok(Self { columns })
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .and_then(|c| c.position)
    }

    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_headers() -> Vec<String> {
        [
            "Nome interno do anúncio",
            "Canal",
            "Chegada",
            "Data de checkout",
            "Número de noites",
            "Total da fatura de hospedagem",
            "Comissão da empresa",
            "Taxas: Taxa de Limpeza",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn every_field_is_mapped_once() {
        for mapping in COLUMN_MAP {
            let count = COLUMN_MAP.iter().filter(|m| m.field == mapping.field).count();
            assert_eq!(count, 1, "{:?} mapped {} times", mapping.field, count);
        }
    }

    #[test]
    fn resolves_source_headers() {
        let index = ColumnIndex::resolve(&source_headers()).unwrap();
        assert_eq!(index.position(Field::ListingName), Some(0));
        assert_eq!(index.position(Field::CheckIn), Some(2));
        assert_eq!(index.position(Field::CleaningFee), Some(7));
    }

    #[test]
    fn accepts_already_renamed_headers_with_padding() {
        let mut headers = source_headers();
        headers[2] = " Check-In ".to_string();
        headers[3] = "Check-Out".to_string();
        let index = ColumnIndex::resolve(&headers).unwrap();
        assert_eq!(index.position(Field::CheckIn), Some(2));
        assert_eq!(index.position(Field::CheckOut), Some(3));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let headers: Vec<String> = source_headers()
            .into_iter()
            .filter(|h| h != "Número de noites")
            .collect();
        let err = ColumnIndex::resolve(&headers).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("Número de noites")));
    }

    #[test]
    fn channel_column_is_optional() {
        let headers: Vec<String> = source_headers().into_iter().filter(|h| h != "Canal").collect();
        let index = ColumnIndex::resolve(&headers).unwrap();
        assert_eq!(index.position(Field::Channel), None);
    }
}
