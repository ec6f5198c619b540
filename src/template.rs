//! Example input file handed to data providers

use crate::report::RenderedDocument;
use crate::types::{CanonicalField, TransactionRecord, TransactionType};

pub const TEMPLATE_FILENAME: &str = "template.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Representative payment used as the template row
pub fn template_record() -> TransactionRecord {
    TransactionRecord {
        tx_type: TransactionType::Payment,
        amount: 1000.0,
        old_balance_sender: 5000.0,
        new_balance_sender: 4000.0,
        old_balance_receiver: 1000.0,
        new_balance_receiver: 2000.0,
    }
}

/// Header row plus one example row, canonical column names, UTF-8.
pub fn template_csv() -> Result<Vec<u8>, csv::Error> {
    let record = template_record();
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(CanonicalField::ALL.iter().map(|f| f.as_str()))?;
    wtr.write_record(CanonicalField::ALL.iter().map(|&field| match record.numeric(field) {
        Some(value) => value.to_string(),
        None => record.tx_type.as_str().to_string(),
    }))?;

    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

pub fn template_document() -> Result<RenderedDocument, csv::Error> {
    Ok(RenderedDocument {
        bytes: template_csv()?,
        filename: TEMPLATE_FILENAME.to_string(),
        content_type: CSV_CONTENT_TYPE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{coerce, normalize, validate};
    use crate::types::RawTable;

    #[test]
    fn test_template_text() {
        let text = String::from_utf8(template_csv().unwrap()).unwrap();
        assert_eq!(
            text,
            "type,amount,oldBalanceSender,newBalanceSender,oldBalanceReceiver,newBalanceReceiver\n\
             PAYMENT,1000,5000,4000,1000,2000\n"
        );
    }

    #[test]
    fn test_template_passes_the_pipeline_schema_unchanged() {
        let bytes = template_csv().unwrap();
        let table = RawTable::from_csv_reader(bytes.as_slice()).unwrap();
        let normalized = normalize(table.clone());
        assert_eq!(normalized.columns, table.columns);

        let batch = coerce(&validate(normalized).unwrap()).unwrap();
        assert_eq!(batch.rows[0].record, template_record());
    }

    #[test]
    fn test_template_document_metadata() {
        let doc = template_document().unwrap();
        assert_eq!(doc.filename, "template.csv");
        assert_eq!(doc.content_type, "text/csv");
    }
}
