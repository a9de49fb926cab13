//! [`Review`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{property, review, user, Review},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<review::Id, Review>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[review::Id]>,
{
    type Ok = HashMap<review::Id, Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<review::Id, Review>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[review::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, property_id, author_id, \
                   rating, comment, likes, \
                   created_at, updated_at \
            FROM reviews \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Review {
                        id,
                        property_id: row.get("property_id"),
                        author_id: row.get("author_id"),
                        stars: review::Stars::new(
                            u8::try_from(row.get::<_, i16>("rating"))
                                .expect("`rating` overflow"),
                        )
                        .expect("`rating` out of range"),
                        comment: row.get("comment"),
                        likes: u32::try_from(row.get::<_, i32>("likes"))
                            .expect("`likes` overflow"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Review>, review::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<review::Id, Review>, [review::Id; 1]>>,
        Ok = HashMap<review::Id, Review>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Review>, (property::Id, user::Id)>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Review>, review::Id>>,
        Ok = Option<Review>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, (property::Id, user::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (property_id, author_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM reviews \
            WHERE property_id = $1::UUID \
              AND author_id = $2::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&property_id, &author_id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Review>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(review)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(review): Update<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            property_id,
            author_id,
            stars,
            comment,
            likes,
            created_at,
            updated_at,
        } = review;

        let rating = i16::from(stars.get());
        let likes = i32::try_from(likes).expect("`likes` overflow");

        const SQL: &str = "\
            INSERT INTO reviews (\
                id, property_id, author_id, \
                rating, comment, likes, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::INT2, $5::VARCHAR, $6::INT4, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                author_id = EXCLUDED.author_id, \
                rating = EXCLUDED.rating, \
                comment = EXCLUDED.comment, \
                likes = EXCLUDED.likes, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &author_id,
                &rating,
                &comment,
                &likes,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Review, review::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Review, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: review::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM reviews \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Review, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Review, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM reviews \
            WHERE property_id = $1::UUID";
        self.exec(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<review::Stars>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<review::Stars>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<review::Stars>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT rating \
            FROM reviews \
            WHERE property_id = $1::UUID";
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                review::Stars::new(
                    u8::try_from(row.get::<_, i16>("rating"))
                        .expect("`rating` overflow"),
                )
                .expect("`rating` out of range")
            })
            .collect())
    }
}

impl<C> Database<Update<By<review::LikeCount, review::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<review::LikeCount>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<review::LikeCount, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: review::Id = by.into_inner();

        const SQL: &str = "\
            UPDATE reviews \
            SET likes = likes + 1 \
            WHERE id = $1::UUID \
            RETURNING likes";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                row.map(|row| {
                    u32::try_from(row.get::<_, i32>("likes"))
                        .expect("`likes` overflow")
                })
            })
    }
}

impl<C> Database<Select<By<Vec<Review>, read::review::ForProperty>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<review::Id, Review>, Vec<review::Id>>>,
        Ok = HashMap<review::Id, Review>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, read::review::ForProperty>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::review::ForProperty { property_id, limit } = by.into_inner();
        let limit = i32::try_from(limit).unwrap();

        const SQL: &str = "\
            SELECT id \
            FROM reviews \
            WHERE property_id = $2::UUID \
            ORDER BY created_at DESC, \
                     id DESC \
            LIMIT $1::INT4";
        let ids = self
            .query(SQL, &[&limit, &property_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<review::Id>>();

        let mut reviews = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.into_iter().filter_map(|id| reviews.remove(&id)).collect())
    }
}

impl<C> Database<Select<By<Vec<Review>, read::review::ByAuthor>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<review::Id, Review>, Vec<review::Id>>>,
        Ok = HashMap<review::Id, Review>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, read::review::ByAuthor>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::review::ByAuthor { author_id, limit } = by.into_inner();
        let limit = i32::try_from(limit).unwrap();

        const SQL: &str = "\
            SELECT id \
            FROM reviews \
            WHERE author_id = $2::UUID \
            ORDER BY created_at DESC, \
                     id DESC \
            LIMIT $1::INT4";
        let ids = self
            .query(SQL, &[&limit, &author_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<review::Id>>();

        let mut reviews = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.into_iter().filter_map(|id| reviews.remove(&id)).collect())
    }
}

impl<C> Database<Select<By<Vec<Review>, read::review::ForHost>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<review::Id, Review>, Vec<review::Id>>>,
        Ok = HashMap<review::Id, Review>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, read::review::ForHost>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::review::ForHost { owner_id, limit } = by.into_inner();
        let limit = i32::try_from(limit).unwrap();

        const SQL: &str = "\
            SELECT r.id \
            FROM reviews AS r \
            JOIN properties AS p ON p.id = r.property_id \
            WHERE p.owner_id = $2::UUID \
            ORDER BY r.created_at DESC, \
                     r.id DESC \
            LIMIT $1::INT4";
        let ids = self
            .query(SQL, &[&limit, &owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<review::Id>>();

        let mut reviews = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.into_iter().filter_map(|id| reviews.remove(&id)).collect())
    }
}
