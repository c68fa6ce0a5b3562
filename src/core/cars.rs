use crate::config::Config;
use crate::db::cars::{delete_car, find_car, get_car, insert_car, list_cars, rename_car};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::car::Car;
use rusqlite::Connection;

/// High-level business logic for the `car` command.
pub struct CarLogic;

fn validated_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("car name is required".into()));
    }
    Ok(name.to_string())
}

impl CarLogic {
    pub fn add(pool: &mut DbPool, name: &str) -> AppResult<Car> {
        let name = validated_name(name)?;
        let car = insert_car(&pool.conn, &name)?;
        ttlog_quiet(&pool.conn, "car_add", &car.id.to_string(), &car.name);
        Ok(car)
    }

    pub fn list(pool: &mut DbPool) -> AppResult<Vec<Car>> {
        list_cars(&pool.conn)
    }

    pub fn rename(pool: &mut DbPool, id: i64, name: &str) -> AppResult<()> {
        let name = validated_name(name)?;
        rename_car(&pool.conn, id, &name)?;
        ttlog_quiet(&pool.conn, "car_rename", &id.to_string(), &name);
        Ok(())
    }

    /// Delete a car together with its parts, values, events and sessions.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<Car> {
        let car = get_car(&pool.conn, id)?;
        delete_car(&pool.conn, id)?;
        ttlog_quiet(&pool.conn, "car_del", &id.to_string(), &car.name);
        Ok(car)
    }

    /// The car commands act on: an explicit id wins, then the configured
    /// default (when it still exists), then the first car created.
    pub fn resolve_active(conn: &Connection, explicit: Option<i64>, cfg: &Config) -> AppResult<Car> {
        if let Some(id) = explicit {
            return get_car(conn, id);
        }
        if let Some(id) = cfg.default_car
            && let Some(car) = find_car(conn, id)?
        {
            return Ok(car);
        }
        list_cars(conn)?.into_iter().next().ok_or(AppError::NoActiveCar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::open_memory;

    #[test]
    fn blank_names_are_rejected() {
        let mut pool = open_memory().unwrap();
        assert!(matches!(
            CarLogic::add(&mut pool, "   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn active_car_fallbacks() {
        let mut pool = open_memory().unwrap();
        let mut cfg = Config::default();

        assert!(matches!(
            CarLogic::resolve_active(&pool.conn, None, &cfg),
            Err(AppError::NoActiveCar)
        ));

        let first = CarLogic::add(&mut pool, "Late Model").unwrap();
        let second = CarLogic::add(&mut pool, "Modified").unwrap();

        assert_eq!(CarLogic::resolve_active(&pool.conn, None, &cfg).unwrap(), first);

        cfg.default_car = Some(second.id);
        assert_eq!(CarLogic::resolve_active(&pool.conn, None, &cfg).unwrap(), second);

        cfg.default_car = Some(999);
        assert_eq!(CarLogic::resolve_active(&pool.conn, None, &cfg).unwrap(), first);

        assert!(matches!(
            CarLogic::resolve_active(&pool.conn, Some(999), &cfg),
            Err(AppError::CarNotFound(999))
        ));
    }
}
