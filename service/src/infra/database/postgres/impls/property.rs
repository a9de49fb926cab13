//! [`Property`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<property::Id, Property>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Property>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, title, description, kind, city, \
                   price_per_night, max_guests, bedrooms, bathrooms, \
                   amenities, images, owner_id, \
                   rating, review_count, \
                   created_at \
            FROM properties \
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
                    Property {
                        id,
                        title: row.get("title"),
                        description: row.get("description"),
                        kind: row.get("kind"),
                        city: row.get("city"),
                        price_per_night: row.get("price_per_night"),
                        max_guests: property::MaxGuests::new(
                            u16::try_from(row.get::<_, i32>("max_guests"))
                                .expect("`max_guests` overflow"),
                        )
                        .expect("`max_guests` out of range"),
                        bedrooms: u16::try_from(
                            row.get::<_, i32>("bedrooms"),
                        )
                        .expect("`bedrooms` overflow"),
                        bathrooms: u16::try_from(
                            row.get::<_, i32>("bathrooms"),
                        )
                        .expect("`bathrooms` overflow"),
                        amenities: row.get("amenities"),
                        images: row.get("images"),
                        owner_id: row.get("owner_id"),
                        rating: row.get("rating"),
                        review_count: u32::try_from(
                            row.get::<_, i32>("review_count"),
                        )
                        .expect("`review_count` overflow"),
                        created_at: row.get("created_at"),
                        // OK, because a `Property` is removed from the
                        // database completely once deleted.
                        deleted_at: None,
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<property::Id, Property>, [property::Id; 1]>>,
        Ok = HashMap<property::Id, Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            title,
            description,
            kind,
            city,
            price_per_night,
            max_guests,
            bedrooms,
            bathrooms,
            amenities,
            images,
            owner_id,
            rating,
            review_count,
            created_at,
            deleted_at,
        } = property;

        let max_guests = i32::from(max_guests.get());
        let bedrooms = i32::from(bedrooms);
        let bathrooms = i32::from(bathrooms);
        let review_count =
            i32::try_from(review_count).expect("`review_count` overflow");

        if deleted_at.is_some() {
            const SQL: &str = "\
                DELETE FROM properties \
                WHERE id = $1::UUID";
            return self
                .exec(SQL, &[&id])
                .await
                .map_err(tracerr::wrap!())
                .map(drop);
        }

        const SQL: &str = "\
            INSERT INTO properties (\
                id, title, description, kind, city, \
                price_per_night, max_guests, bedrooms, bathrooms, \
                amenities, images, owner_id, \
                rating, review_count, \
                created_at \
            ) VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, \
                $4::INT2, \
                $5::VARCHAR, \
                $6::NUMERIC, \
                $7::INT4, $8::INT4, $9::INT4, \
                $10::VARCHAR[], $11::VARCHAR[], \
                $12::UUID, \
                $13::NUMERIC, $14::INT4, \
                $15::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                kind = EXCLUDED.kind, \
                city = EXCLUDED.city, \
                price_per_night = EXCLUDED.price_per_night, \
                max_guests = EXCLUDED.max_guests, \
                bedrooms = EXCLUDED.bedrooms, \
                bathrooms = EXCLUDED.bathrooms, \
                amenities = EXCLUDED.amenities, \
                images = EXCLUDED.images, \
                owner_id = EXCLUDED.owner_id, \
                rating = EXCLUDED.rating, \
                review_count = EXCLUDED.review_count, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &title,
                &description,
                &kind,
                &city,
                &price_per_night,
                &max_guests,
                &bedrooms,
                &bathrooms,
                &amenities,
                &images,
                &owner_id,
                &rating,
                &review_count,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO properties_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::property::list::Page, read::property::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::property::list::Page, read::property::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::list::Selector {
            arguments,
            filter:
                read::property::list::Filter {
                    keyword,
                    city,
                    owner,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });

        let keyword_pattern =
            keyword.as_ref().map(|k| LikePattern::new(k.as_ref()));
        let keyword_idx = keyword_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let city_idx = city.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let owner_idx = owner.as_ref().map(|o| {
            ps.push(o);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM properties \
             WHERE true \
                   {cursor} \
                   {keyword_filtering} \
                   {city_filtering} \
                   {owner_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            keyword_filtering =
                keyword_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(title) LIKE LOWER(${idx}::VARCHAR)"
                    ))
                }),
            city_filtering = city_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND LOWER(city) = LOWER(${idx}::VARCHAR)"))
            }),
            owner_filtering =
                owner_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND owner_id = ${idx}::UUID"))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::property::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::property::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::property::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM properties";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Select<By<Vec<property::Id>, read::property::TopRated>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<property::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<property::Id>, read::property::TopRated>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::TopRated { limit } = by.into_inner();
        let limit = i32::try_from(limit).unwrap();

        // Ties resolve to insertion order.
        const SQL: &str = "\
            SELECT id \
            FROM properties \
            ORDER BY rating DESC, \
                     created_at ASC, \
                     id ASC \
            LIMIT $1::INT4";
        Ok(self
            .query(SQL, &[&limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect())
    }
}

impl<C> Database<Select<By<Vec<property::City>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<property::City>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<property::City>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT DISTINCT city \
            FROM properties \
            ORDER BY city ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("city"))
            .collect())
    }
}
