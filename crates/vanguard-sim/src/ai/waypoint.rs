//! Waypoint-patrol AI.
//!
//! Flies the entity through its waypoint list with the shared steering
//! law: bank toward the great-circle bearing, trim angle of attack toward
//! the leg altitude, and walk the throttle toward the commanded speed.

use vanguard_core::constants::WAYPOINT_ARRIVAL_RADIUS;
use vanguard_core::geo::Geodetic;
use vanguard_core::Entity;

use super::steer;

/// Throttle walk rate (per second) outside the ±5 % speed band.
const THROTTLE_RATE: f64 = 0.1;

pub fn update(entity: &mut Entity, dt: f64) {
    if entity.patrol.waypoints.is_empty() {
        return;
    }

    let last = entity.patrol.waypoints.len() - 1;
    entity.patrol.current = entity.patrol.current.min(last);

    // Arrival check, then steer at whatever is now current.
    let wp = entity.patrol.waypoints[entity.patrol.current];
    let wp_geo = Geodetic::new(wp.lat_deg, wp.lon_deg, wp.alt_m);
    if entity.geo.haversine_to(&wp_geo) < WAYPOINT_ARRIVAL_RADIUS {
        if entity.patrol.current < last {
            entity.patrol.current += 1;
        } else if entity.patrol.loop_route {
            entity.patrol.current = 0;
        }
        // Not looping: hold on the last waypoint.
    }

    let wp = entity.patrol.waypoints[entity.patrol.current];
    let wp_geo = Geodetic::new(wp.lat_deg, wp.lon_deg, wp.alt_m);
    let bearing = entity.geo.bearing_to(&wp_geo);
    steer(
        &mut entity.flight,
        bearing,
        wp.alt_m - entity.geo.alt_m,
        dt,
    );

    let desired_speed = if wp.speed > 0.0 {
        wp.speed
    } else {
        entity.flight.tas
    };
    if entity.flight.tas < 0.95 * desired_speed {
        entity.flight.throttle += THROTTLE_RATE * dt;
    } else if entity.flight.tas > 1.05 * desired_speed {
        entity.flight.throttle -= THROTTLE_RATE * dt;
    }
    entity.flight.throttle = entity.flight.throttle.clamp(0.3, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_core::entity::Waypoint;
    use vanguard_core::enums::{AiKind, PhysicsKind};

    fn patroller(waypoints: Vec<Waypoint>, loop_route: bool) -> Entity {
        let mut e = Entity::new("p1", "P 1", "fighter", "blue");
        e.physics = PhysicsKind::Flight3Dof;
        e.ai = AiKind::WaypointPatrol;
        e.geo = Geodetic::new(0.0, 0.0, 5_000.0);
        e.flight.tas = 220.0;
        e.patrol.waypoints = waypoints;
        e.patrol.loop_route = loop_route;
        e
    }

    fn wp(lat: f64, lon: f64) -> Waypoint {
        Waypoint {
            lat_deg: lat,
            lon_deg: lon,
            alt_m: 5_000.0,
            speed: 220.0,
        }
    }

    #[test]
    fn advances_on_arrival() {
        let mut e = patroller(vec![wp(0.0, 0.001), wp(0.0, 1.0)], false);
        update(&mut e, 0.1);
        assert_eq!(e.patrol.current, 1);
    }

    #[test]
    fn holds_last_waypoint_without_loop() {
        let mut e = patroller(vec![wp(0.0, 0.001)], false);
        update(&mut e, 0.1);
        assert_eq!(e.patrol.current, 0);
    }

    #[test]
    fn wraps_with_loop() {
        let mut e = patroller(vec![wp(0.0, 1.0), wp(0.0, 0.001)], true);
        e.patrol.current = 1;
        update(&mut e, 0.1);
        assert_eq!(e.patrol.current, 0);
    }

    #[test]
    fn throttle_rises_when_slow() {
        let mut e = patroller(vec![wp(0.0, 1.0)], false);
        e.flight.tas = 150.0;
        e.flight.throttle = 0.5;
        update(&mut e, 0.1);
        assert!(e.flight.throttle > 0.5);
    }

    #[test]
    fn throttle_stays_in_band() {
        let mut e = patroller(vec![wp(0.0, 1.0)], false);
        e.flight.tas = 500.0;
        e.flight.throttle = 0.31;
        for _ in 0..100 {
            update(&mut e, 0.1);
        }
        assert!(e.flight.throttle >= 0.3);
    }
}
