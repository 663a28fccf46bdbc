//! `PostgreSQL` address book store.

use async_trait::async_trait;
use sqlx::PgPool;

use shoply_core::{AddressId, UserId};

use super::{AddressStore, RepositoryError, owner_from_row};
use crate::models::{Address, AddressFields};

const ADDRESS_COLUMNS: &str = "id, uid, first_name, last_name, country, company, street, apt, \
     city, state, number, postal_code, instruction, shipping, billing";

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    uid: String,
    first_name: String,
    last_name: String,
    country: String,
    company: Option<String>,
    street: String,
    apt: Option<String>,
    city: String,
    state: String,
    number: String,
    postal_code: String,
    instruction: Option<String>,
    shipping: bool,
    billing: bool,
}

impl TryFrom<AddressRow> for Address {
    type Error = RepositoryError;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            owner: owner_from_row(&row.uid)?,
            fields: AddressFields {
                first_name: row.first_name,
                last_name: row.last_name,
                country: row.country,
                company: row.company,
                street: row.street,
                apt: row.apt,
                city: row.city,
                state: row.state,
                number: row.number,
                postal_code: row.postal_code,
                instruction: row.instruction,
                shipping: row.shipping,
                billing: row.billing,
            },
        })
    }
}

/// Address store backed by `storefront.address`.
pub struct PgAddressStore {
    pool: PgPool,
}

impl PgAddressStore {
    /// Create a new address store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressStore for PgAddressStore {
    async fn insert(&self, address: &Address) -> Result<Address, RepositoryError> {
        let f = &address.fields;
        let sql = format!(
            r"
            INSERT INTO storefront.address
                (id, uid, first_name, last_name, country, company, street, apt,
                 city, state, number, postal_code, instruction, shipping, billing)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {ADDRESS_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(address.id)
            .bind(address.owner.as_str())
            .bind(&f.first_name)
            .bind(&f.last_name)
            .bind(&f.country)
            .bind(&f.company)
            .bind(&f.street)
            .bind(&f.apt)
            .bind(&f.city)
            .bind(&f.state)
            .bind(&f.number)
            .bind(&f.postal_code)
            .bind(&f.instruction)
            .bind(f.shipping)
            .bind(f.billing)
            .fetch_one(&self.pool)
            .await?;

        Address::try_from(row)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM storefront.address WHERE uid = $1 ORDER BY created_at"
        );

        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Address::try_from).collect()
    }

    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let sql = format!("SELECT {ADDRESS_COLUMNS} FROM storefront.address WHERE id = $1");

        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Address::try_from).transpose()
    }

    async fn update(
        &self,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Option<Address>, RepositoryError> {
        let sql = format!(
            r"
            UPDATE storefront.address
            SET first_name = $2, last_name = $3, country = $4, company = $5,
                street = $6, apt = $7, city = $8, state = $9, number = $10,
                postal_code = $11, instruction = $12, shipping = $13, billing = $14,
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {ADDRESS_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.country)
            .bind(&fields.company)
            .bind(&fields.street)
            .bind(&fields.apt)
            .bind(&fields.city)
            .bind(&fields.state)
            .bind(&fields.number)
            .bind(&fields.postal_code)
            .bind(&fields.instruction)
            .bind(fields.shipping)
            .bind(fields.billing)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Address::try_from).transpose()
    }

    async fn delete_by_id(&self, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.address WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
