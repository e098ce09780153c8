use super::BankStore;
use crate::{
    error::{BankError, BankResult},
    models::Customer,
    types::CustomerId,
};
use rusqlite::{params, OptionalExtension};

impl BankStore {
    // ── Customer ──────────────────────────────────────────────────

    /// Insert a customer and return its generated id. A duplicate email is
    /// an `Integrity` error.
    pub fn create_customer(&self, name: &str, email: &str, phone: &str) -> BankResult<CustomerId> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(BankError::InvalidRequest(
                "customer name and email are required".into(),
            ));
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO customers (name, email, phone) VALUES (?1, ?2, ?3)",
            params![name, email, phone],
        )?;
        let customer_id = conn.last_insert_rowid();
        log::debug!("created customer {customer_id} <{email}>");
        Ok(customer_id)
    }

    pub fn get_customer(&self, customer_id: CustomerId) -> BankResult<Option<Customer>> {
        let customer = self
            .conn()?
            .query_row(
                "SELECT customer_id, name, email, phone FROM customers WHERE customer_id = ?1",
                params![customer_id],
                |row| {
                    Ok(Customer {
                        customer_id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        phone: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(customer)
    }
}
