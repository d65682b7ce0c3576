//! Customer schema
//!
//! Author: Test
//! Copyright (C) 2030, Test Co

use rowguard::catalog::{DataType, Flag};
use rowguard::schema::{ColumnDef, Length, Schema, Value};

const E1: &[&str] = &["basic", "gold", "it's"];

pub fn schema() -> Schema {
    Schema::new("customer")
        .column("id",     ColumnDef::declare(DataType::Int,       None,                                            &[Flag::PrimaryKey, Flag::AutoIncrement, Flag::Unsigned], None))
        .column("email",  ColumnDef::declare(DataType::VarChar,   Some(Length::Max(64)),                           &[Flag::NotNull],                                         None))
        .column("tier",   ColumnDef::declare(DataType::Enum,      Some(Length::values(E1)),                        &[Flag::NotNull],                                         Some(Value::String("basic".into()))))
        .column("credit", ColumnDef::declare(DataType::Decimal,   Some(Length::Precision { digits: 8, scale: 2 }), &[],                                                      Some(Value::Float(0.0))))
        .column("joined", ColumnDef::declare(DataType::Timestamp, None,                                            &[Flag::NotNull],                                         Some(Value::Date("CURRENT_TIMESTAMP".into()))))
}

// End of file customer_schema.rs
// Location: ./src/schemas/customer_schema.rs
