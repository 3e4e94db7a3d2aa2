//! PostgreSQL user store
//!
//! Expects the `tbl_user` / `tbl_address` tables to exist; schema
//! management happens outside this service. Enum-valued columns are read
//! through `::text` so they may be either text or native enum columns.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use super::error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use super::traits::{RepositoryResult, UserRepository};
use crate::filter::{comparable_column, Predicate};
use crate::models::{Address, NewUser, User, UserChanges, UserField};
use crate::pagination::{Page, PageRequest};

const USER_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender::text AS gender, \
     phone, email, username, password, \"type\"::text AS user_type, status::text AS status, \
     created_at, updated_at";

const ADDRESS_COLUMNS: &str = "user_id, apartment_number, floor, building, street_number, \
     street, city, country, address_type";

/// User store backed by a `sqlx` connection pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

fn decode_error(message: String) -> RepositoryError {
    RepositoryError::new(
        RepositoryOperation::FindPage,
        RepositoryErrorKind::SerializationError,
        message,
    )
}

fn user_from_row(row: &PgRow) -> RepositoryResult<User> {
    let gender: Option<String> = row.try_get("gender")?;
    let user_type: Option<String> = row.try_get("user_type")?;
    let status: String = row.try_get("status")?;

    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        gender: gender
            .map(|g| g.parse())
            .transpose()
            .map_err(|e| decode_error(format!("{}", e)))?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        user_type: user_type
            .map(|t| t.parse())
            .transpose()
            .map_err(|e| decode_error(format!("{}", e)))?,
        status: status.parse().map_err(|e| decode_error(format!("{}", e)))?,
        addresses: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn address_from_row(row: &PgRow) -> RepositoryResult<(i64, Address)> {
    Ok((
        row.try_get("user_id")?,
        Address {
            apartment_number: row.try_get("apartment_number")?,
            floor: row.try_get("floor")?,
            building: row.try_get("building")?,
            street_number: row.try_get("street_number")?,
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
            address_type: row.try_get("address_type")?,
        },
    ))
}

fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, page: &PageRequest<UserField>) {
    qb.push(" ORDER BY ");
    for key in &page.sort {
        qb.push(comparable_column(key.field))
            .push(" ")
            .push(key.direction.as_sql())
            .push(", ");
    }
    qb.push("id ASC");
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn attach_addresses(&self, users: &mut [User]) -> RepositoryResult<()> {
        if users.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let sql = format!(
            "SELECT {} FROM tbl_address WHERE user_id = ANY($1) ORDER BY id",
            ADDRESS_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(&ids).fetch_all(&self.pool).await?;

        let mut by_user: HashMap<i64, Vec<Address>> = HashMap::new();
        for row in &rows {
            let (user_id, address) = address_from_row(row)?;
            by_user.entry(user_id).or_default().push(address);
        }
        for user in users.iter_mut() {
            user.addresses = by_user.remove(&user.id).unwrap_or_default();
        }
        Ok(())
    }
}

impl UserRepository for PgUserRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Ping))?;
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM tbl_user WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindById))?;

        match row {
            Some(row) => {
                let mut users = vec![user_from_row(&row)?];
                self.attach_addresses(&mut users).await?;
                Ok(users.pop())
            }
            None => Ok(None),
        }
    }

    async fn find_page(
        &self,
        predicate: &Predicate<UserField>,
        page: &PageRequest<UserField>,
    ) -> RepositoryResult<Page<User>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tbl_user WHERE ");
        predicate.push_sql(&mut count);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM tbl_user WHERE ",
            USER_COLUMNS
        ));
        predicate.push_sql(&mut select);
        push_order_by(&mut select, page);
        select
            .push(" LIMIT ")
            .push_bind(to_i64(page.limit()))
            .push(" OFFSET ")
            .push_bind(to_i64(page.offset()));

        let rows = select.build().fetch_all(&self.pool).await?;
        let mut users = rows
            .iter()
            .map(user_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        self.attach_addresses(&mut users).await?;

        Ok(Page::new(
            users,
            page.page_index,
            page.page_size,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let on_error = |e: sqlx::Error| {
            let err = RepositoryError::from(e).with_operation(RepositoryOperation::Create);
            if err.kind == RepositoryErrorKind::AlreadyExists {
                err.with_entity("User", user.username.clone())
            } else {
                err
            }
        };

        let mut tx = self.pool.begin().await.map_err(on_error)?;
        let sql = format!(
            "INSERT INTO tbl_user (first_name, last_name, date_of_birth, gender, phone, email, \
             username, password, \"type\", status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW()) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(user.gender.map(|g| g.as_str()))
            .bind(&user.phone)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password)
            .bind(user.user_type.map(|t| t.as_str()))
            .bind(user.status.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(on_error)?;
        let mut stored = user_from_row(&row)?;

        for address in &user.addresses {
            sqlx::query(
                "INSERT INTO tbl_address (user_id, apartment_number, floor, building, \
                 street_number, street, city, country, address_type) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(stored.id)
            .bind(&address.apartment_number)
            .bind(&address.floor)
            .bind(&address.building)
            .bind(&address.street_number)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.country)
            .bind(address.address_type)
            .execute(&mut *tx)
            .await
            .map_err(on_error)?;
        }

        tx.commit().await.map_err(on_error)?;
        stored.addresses = user.addresses.clone();
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepositoryResult<User> {
        let mut user = self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::not_found("User", id.to_string())
                .with_operation(RepositoryOperation::Update)
        })?;
        changes.apply(&mut user);

        let updated_at: DateTime<Utc> = sqlx::query_scalar(
            "UPDATE tbl_user SET first_name = $1, last_name = $2, phone = $3, email = $4, \
             password = $5, status = $6, \"type\" = $7, gender = $8, updated_at = NOW() \
             WHERE id = $9 RETURNING updated_at",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.status.as_str())
        .bind(user.user_type.map(|t| t.as_str()))
        .bind(user.gender.map(|g| g.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
        .ok_or_else(|| {
            RepositoryError::not_found("User", id.to_string())
                .with_operation(RepositoryOperation::Update)
        })?;

        user.updated_at = updated_at;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let on_error = |e: sqlx::Error| RepositoryError::from(e).with_operation(RepositoryOperation::Delete);

        let mut tx = self.pool.begin().await.map_err(on_error)?;
        sqlx::query("DELETE FROM tbl_address WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(on_error)?;
        let result = sqlx::query("DELETE FROM tbl_user WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(on_error)?;
        tx.commit().await.map_err(on_error)?;

        Ok(result.rows_affected() > 0)
    }
}
