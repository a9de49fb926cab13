//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Debug)]
pub struct CreateUser {
    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Role`] of a new [`User`].
    pub role: user::Role,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            email,
            password,
            role,
        } = cmd;

        let u = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let password_hash = user::PasswordHash::new(password.expose_secret())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let user = User {
            id: user::Id::new(),
            name,
            email,
            password_hash,
            role,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Email`] is already occupied.
    #[display("`{_0}` email is occupied by another `User`")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] user::Email),

    /// Failed to hash the provided [`Password`].
    #[display("Failed to hash `Password`: {_0}")]
    PasswordHash(argon2::password_hash::Error),
}
