#[cfg(test)]
mod tests {
    use crate::commands::FleetCommand;
    use crate::components::{Unit, UnitPatch};
    use crate::enums::*;
    use crate::events::FleetEvent;
    use crate::state::{FleetSnapshot, FleetSummary};
    use crate::types::{normalize_heading, GeoPoint, SimTime};

    #[test]
    fn test_unit_status_serializes_snake_case() {
        let json = serde_json::to_string(&UnitStatus::Returning).unwrap();
        assert_eq!(json, "\"returning\"");
        let back: UnitStatus = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(back, UnitStatus::Maintenance);
    }

    /// Commands are a tagged union so UI bridges can send plain JSON objects.
    #[test]
    fn test_fleet_command_tagged_json() {
        let cmd: FleetCommand =
            serde_json::from_str(r#"{"type":"SelectUnit","id":"UA-101"}"#).unwrap();
        assert_eq!(
            cmd,
            FleetCommand::SelectUnit {
                id: "UA-101".into()
            }
        );

        let cmd: FleetCommand =
            serde_json::from_str(r#"{"type":"SetStrategy","strategy":"patrol_pattern"}"#).unwrap();
        assert_eq!(
            cmd,
            FleetCommand::SetStrategy {
                strategy: StrategyKind::PatrolPattern
            }
        );
    }

    #[test]
    fn test_set_target_command_json() {
        let cmd: FleetCommand = serde_json::from_str(
            r#"{"type":"SetTarget","target":{"lat":48.25,"lng":16.41}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            FleetCommand::SetTarget {
                target: GeoPoint::new(48.25, 16.41)
            }
        );
    }

    #[test]
    fn test_unit_patch_missing_fields_default_to_none() {
        let cmd: FleetCommand =
            serde_json::from_str(r#"{"type":"UpdateUnit","id":"UA-7","patch":{"battery":42.0}}"#)
                .unwrap();
        match cmd {
            FleetCommand::UpdateUnit { id, patch } => {
                assert_eq!(id, "UA-7");
                assert_eq!(patch.battery, Some(42.0));
                assert_eq!(
                    patch,
                    UnitPatch {
                        battery: Some(42.0),
                        ..Default::default()
                    }
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_fleet_event_serde() {
        let event = FleetEvent::StatusChanged {
            id: "UA-1".into(),
            from: UnitStatus::Active,
            to: UnitStatus::Returning,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"StatusChanged\""));
        let back: FleetEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_snapshot_default_is_stopped_and_empty() {
        let snap = FleetSnapshot::default();
        assert!(!snap.is_running());
        assert!(snap.units.is_empty());
        assert!(snap.selected.is_none());
        assert_eq!(snap.strategy, StrategyKind::RandomWalk);
    }

    #[test]
    fn test_summary_counts_statuses() {
        let make = |id: &str, status| Unit {
            id: id.into(),
            status,
            ..Default::default()
        };
        let units = vec![
            make("a", UnitStatus::Active),
            make("b", UnitStatus::Active),
            make("c", UnitStatus::Returning),
            make("d", UnitStatus::Maintenance),
        ];
        let summary = FleetSummary::from_units(&units);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.returning, 1);
        assert_eq!(summary.maintenance, 1);
    }

    // ---- Strategy metadata ----

    #[test]
    fn test_strategy_ids_round_trip_through_from_str() {
        for kind in StrategyKind::ALL {
            let parsed: StrategyKind = kind.id().parse().unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(kind.to_string(), kind.id());
            assert!(!kind.name().is_empty());
            assert!(!kind.description().is_empty());
        }
        assert!("barrel_roll".parse::<StrategyKind>().is_err());
    }

    // ---- Geometry ----

    #[test]
    fn test_normalize_heading_wraps_both_directions() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert!((normalize_heading(365.0) - 5.0).abs() < 1e-9);
        assert!((normalize_heading(-90.0) - 270.0).abs() < 1e-9);
        let tiny = normalize_heading(-1e-17);
        assert!((0.0..360.0).contains(&tiny), "got {tiny}");
    }

    #[test]
    fn test_planar_heading_cardinals() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((origin.planar_heading_to(&GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((origin.planar_heading_to(&GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((origin.planar_heading_to(&GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((origin.planar_heading_to(&GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_planar_distance() {
        let a = GeoPoint::new(48.0, 16.0);
        let b = GeoPoint::new(48.003, 16.004);
        assert!((a.planar_distance_to(&b) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let km = a.haversine_km(&b);
        assert!((km - 111.195).abs() < 0.01, "got {km}");
        assert_eq!(a.haversine_km(&a), 0.0);
    }

    #[test]
    fn test_grid_reference() {
        assert_eq!(GeoPoint::new(52.1986, 8.5911).grid_reference(), "B5");
        assert_eq!(GeoPoint::new(48.25, 16.38).grid_reference(), "O3");
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        time.advance(1.0);
        time.advance(1.0);
        assert_eq!(time.tick, 2);
        assert!((time.elapsed_secs - 2.0).abs() < 1e-12);
    }
}
