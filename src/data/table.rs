use crate::format::format_eur;

use super::model::SalesRecord;

/// Columns available in the client table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    ClientCode,
    ClientName,
    ClientCodeNorm,
    NetSales,
    Segment,
}

impl TableColumn {
    pub fn header(self) -> &'static str {
        match self {
            TableColumn::ClientCode => "Original code",
            TableColumn::ClientName => "Client",
            TableColumn::ClientCodeNorm => "Normalized code",
            TableColumn::NetSales => "Net sales (€)",
            TableColumn::Segment => "Segment",
        }
    }

    pub fn cell(self, record: &SalesRecord) -> String {
        match self {
            TableColumn::ClientCode => record.client_code.clone(),
            TableColumn::ClientName => record.client_name.clone(),
            TableColumn::ClientCodeNorm => record.client_code_norm.to_string(),
            TableColumn::NetSales if record.net_sales.is_nan() => String::new(),
            TableColumn::NetSales => format_eur(record.net_sales),
            TableColumn::Segment => record.segment.display_label().to_string(),
        }
    }
}

/// Visible columns; the name column only appears when names are shown.
pub fn table_columns(show_names: bool) -> Vec<TableColumn> {
    let mut cols = vec![
        TableColumn::ClientCode,
        TableColumn::ClientCodeNorm,
        TableColumn::NetSales,
        TableColumn::Segment,
    ];
    if show_names {
        cols.insert(1, TableColumn::ClientName);
    }
    cols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_follow_name_toggle() {
        assert!(!table_columns(false).contains(&TableColumn::ClientName));
        assert_eq!(table_columns(true)[1], TableColumn::ClientName);
        assert_eq!(table_columns(true).len(), 5);
    }

    #[test]
    fn test_cells() {
        let rec = SalesRecord::new("0042", 42, "Acme", 15_000.0, 2024);
        let row: Vec<String> = table_columns(true).iter().map(|c| c.cell(&rec)).collect();
        assert_eq!(row, vec!["0042", "Acme", "42", "15.000,00 €", "10K–15K"]);
    }

    #[test]
    fn test_blank_amount_cell() {
        let rec = SalesRecord::new("0042", 42, "Acme", f64::NAN, 2024);
        assert_eq!(TableColumn::NetSales.cell(&rec), "");
        assert_eq!(TableColumn::Segment.cell(&rec), "<10K");
    }
}
