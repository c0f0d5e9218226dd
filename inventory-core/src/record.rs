use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One column of the asset table. Column names are fixed (German) and
/// matched exactly after trimming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    InvoiceDate,
    InvoiceNumber,
    OrderNumber,
    Warranty,
    Vendor,
    InventoryNumber,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 6] = [
        Field::InvoiceDate,
        Field::InvoiceNumber,
        Field::OrderNumber,
        Field::Warranty,
        Field::Vendor,
        Field::InventoryNumber,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::InvoiceDate => "Rechnungsdatum",
            Field::InvoiceNumber => "Rechnungsnummer",
            Field::OrderNumber => "Bestellnummer",
            Field::Warranty => "Garantie",
            Field::Vendor => "Händler",
            Field::InventoryNumber => "Inventarnummer",
        }
    }

    pub fn from_column(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL.into_iter().find(|f| f.column() == name)
    }
}

/// An asset as it appears on the label and in the inventory table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(rename = "Rechnungsdatum", default)]
    pub invoice_date: String,
    #[serde(rename = "Rechnungsnummer", default)]
    pub invoice_number: String,
    #[serde(rename = "Bestellnummer", default)]
    pub order_number: String,
    #[serde(rename = "Garantie", default)]
    pub warranty: String,
    #[serde(rename = "Händler", default)]
    pub vendor: String,
    #[serde(rename = "Inventarnummer", default)]
    pub inventory_number: String,
}

impl AssetRecord {
    /// Build a record from named values; absent fields are empty.
    pub fn from_fields(values: &HashMap<Field, String>) -> Self {
        let mut rec = AssetRecord::default();
        for (field, value) in values {
            rec.set(*field, value.clone());
        }
        rec
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::InvoiceDate => &self.invoice_date,
            Field::InvoiceNumber => &self.invoice_number,
            Field::OrderNumber => &self.order_number,
            Field::Warranty => &self.warranty,
            Field::Vendor => &self.vendor,
            Field::InventoryNumber => &self.inventory_number,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::InvoiceDate => &mut self.invoice_date,
            Field::InvoiceNumber => &mut self.invoice_number,
            Field::OrderNumber => &mut self.order_number,
            Field::Warranty => &mut self.warranty,
            Field::Vendor => &mut self.vendor,
            Field::InventoryNumber => &mut self.inventory_number,
        };
        *slot = value;
    }

    /// Trimmed inventory number; empty means "not assigned yet".
    pub fn identifier(&self) -> &str {
        self.inventory_number.trim()
    }

    pub fn has_identifier(&self) -> bool {
        !self.identifier().is_empty()
    }

    /// Label text, one `"<Column>: <value>"` line per field.
    pub fn text_lines(&self) -> Vec<String> {
        Field::ALL
            .iter()
            .map(|f| format!("{}: {}", f.column(), self.get(*f)))
            .collect()
    }

    /// Payload encoded into the label's QR code.
    pub fn qr_payload(&self) -> String {
        self.text_lines().join("\n")
    }

    /// Values in column order, for writing a table row.
    pub fn to_row(&self) -> [&str; 6] {
        Field::ALL.map(|f| self.get(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_read_as_empty() {
        let mut values = HashMap::new();
        values.insert(Field::Vendor, "Conrad".to_string());
        let rec = AssetRecord::from_fields(&values);
        assert_eq!(rec.get(Field::Vendor), "Conrad");
        assert_eq!(rec.get(Field::InvoiceDate), "");
        assert!(!rec.has_identifier());
    }

    #[test]
    fn column_lookup_trims() {
        assert_eq!(Field::from_column(" Händler "), Some(Field::Vendor));
        assert_eq!(Field::from_column("haendler"), None);
    }

    #[test]
    fn text_lines_follow_column_order() {
        let rec = AssetRecord {
            invoice_date: "03.04.2024".into(),
            inventory_number: "1000001".into(),
            ..Default::default()
        };
        let lines = rec.text_lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Rechnungsdatum: 03.04.2024");
        assert_eq!(lines[3], "Garantie: ");
        assert_eq!(lines[5], "Inventarnummer: 1000001");
        assert_eq!(rec.qr_payload().lines().count(), 6);
    }

    #[test]
    fn whitespace_identifier_is_blank() {
        let rec = AssetRecord {
            inventory_number: "  ".into(),
            ..Default::default()
        };
        assert!(!rec.has_identifier());
    }
}
