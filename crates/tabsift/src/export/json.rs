//! Json writing as an array of records.

use crate::error::Result;
use crate::table::{Cell, Table};
use serde_json::{Map, Number, Value};

/// One object per row, keys in column order, missing cells as `null`.
pub(crate) fn write_table(table: &Table) -> Result<Vec<u8>> {
    let records: Vec<Value> = (0..table.row_count())
        .map(|row| {
            let record: Map<String, Value> = table
                .columns()
                .iter()
                .map(|column| {
                    let value = column.get(row).map_or(Value::Null, to_value);
                    (column.name().to_string(), value)
                })
                .collect();
            Value::Object(record)
        })
        .collect();
    Ok(serde_json::to_vec(&records)?)
}

fn to_value(cell: &Cell) -> Value {
    match cell {
        _ if cell.is_missing() => Value::Null,
        Cell::Number(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Missing => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn test_records_keep_column_order() {
        let table = Table::new(vec![
            Column::from_values("z", [2.0]),
            Column::from_values("a", ["x"]),
        ])
        .unwrap();
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        assert_eq!(text, r#"[{"z":2.0,"a":"x"}]"#);
    }

    #[test]
    fn test_blank_text_is_null() {
        let table = Table::new(vec![Column::new("a", vec![Cell::Text("  ".into())])]).unwrap();
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        assert_eq!(text, r#"[{"a":null}]"#);
    }
}
