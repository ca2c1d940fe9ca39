use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use stadium_booking_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::stadiums::{ActiveModel, Amenities, Column, Entity as Stadiums},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    seed_stadiums(&orm).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_stadiums(orm: &OrmConn) -> anyhow::Result<()> {
    let stadiums = [
        (
            "Riverside Arena",
            "North District",
            22,
            100.0,
            "Full-size turf pitch by the river",
            &["floodlights", "changing rooms", "parking"][..],
        ),
        (
            "Downtown Five",
            "City Centre",
            10,
            60.0,
            "Indoor five-a-side court",
            &["indoor", "showers"][..],
        ),
        (
            "Hillside Ground",
            "East Hills",
            30,
            150.0,
            "Natural grass with spectator stand",
            &["stand", "cafe", "floodlights"][..],
        ),
    ];

    for (name, location, capacity, price_per_hour, description, amenities) in stadiums {
        let exists = Stadiums::find()
            .filter(Column::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            println!("Stadium {name} already present");
            continue;
        }

        ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            location: Set(location.to_string()),
            capacity: Set(capacity),
            price_per_hour: Set(price_per_hour),
            description: Set(Some(description.to_string())),
            amenities: Set(Amenities(amenities.iter().map(|a| a.to_string()).collect())),
            image: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await?;
        println!("Seeded stadium {name}");
    }

    Ok(())
}
