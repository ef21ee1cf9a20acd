//! Brightness filter and transmission ranking.

use crate::domain::DerivedSystemRecord;
use crate::error::CatalogueError;

/// Keep records with a reliable brightness measurement (`V > 0` and `K > 0`).
///
/// Unmatched systems carry zero magnitudes and are always removed here.
pub fn filter_reliable_brightness(records: &[DerivedSystemRecord]) -> Vec<DerivedSystemRecord> {
    records
        .iter()
        .filter(|r| r.merged.observables.vmag > 0.0 && r.merged.observables.kmag > 0.0)
        .cloned()
        .collect()
}

/// Sort by descending transmission metric. The sort is stable, so ties keep
/// their input order.
///
/// Every record must carry signal metrics.
pub fn rank_by_transmission(records: &[DerivedSystemRecord]) -> Result<Vec<DerivedSystemRecord>, CatalogueError> {
    let mut keyed = records
        .iter()
        .map(|r| {
            let key = r.transmission().ok_or(CatalogueError::RankingUnavailable)?;
            // NaN sorts last.
            Ok((if key.is_nan() { f64::NEG_INFINITY } else { key }, r))
        })
        .collect::<Result<Vec<_>, CatalogueError>>()?;

    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    Ok(keyed.into_iter().map(|(_, r)| r.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MergedSystemRecord, Observables, PhysicalQuantities, RawPhysicalRecord, SignalMetrics};

    fn record(name: &str, vmag: f64, kmag: f64, transmission: Option<f64>) -> DerivedSystemRecord {
        DerivedSystemRecord {
            merged: MergedSystemRecord {
                physical: RawPhysicalRecord {
                    name: name.to_string(),
                    tstar: 5500.0,
                    metalstar: 0.0,
                    mstar: 1.0,
                    rstar: 1.0,
                    loggstar: 4.5,
                    a_tabulated: 0.04,
                    mplanet: 0.5,
                    rplanet: 1.2,
                    littleg_tabulated: 10.0,
                    rhoplanet_tabulated: 0.3,
                    tplanet_tabulated: 1300.0,
                },
                observables: Observables {
                    vmag,
                    kmag,
                    ..Observables::default()
                },
                matched: vmag > 0.0,
            },
            derived: PhysicalQuantities {
                littleg: 10.0,
                rhoplanet: 400.0,
                a: 0.04,
                a_rs: 8.0,
                tplanet: 1300.0,
                rp_rs: 0.12,
            },
            signal: transmission.map(|t| SignalMetrics {
                emission: 1.0,
                transmission: t,
            }),
        }
    }

    fn names(records: &[DerivedSystemRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn drops_non_positive_magnitudes() {
        let input = [
            record("ok", 10.0, 9.0, None),
            record("unmatched", 0.0, 0.0, None),
            record("no-k", 11.0, 0.0, None),
            record("neg-v", -1.0, 8.0, None),
        ];
        assert_eq!(names(&filter_reliable_brightness(&input)), ["ok"]);
    }

    #[test]
    fn ranks_descending() {
        let input = [
            record("a", 10.0, 9.0, Some(3.0)),
            record("b", 10.0, 9.0, Some(1.0)),
            record("c", 10.0, 9.0, Some(2.0)),
        ];
        let ranked = rank_by_transmission(&input).unwrap();
        let values: Vec<f64> = ranked.iter().filter_map(|r| r.transmission()).collect();
        assert_eq!(values, [3.0, 2.0, 1.0]);
    }

    #[test]
    fn ties_keep_input_order() {
        let input = [
            record("first", 10.0, 9.0, Some(1.0)),
            record("top", 10.0, 9.0, Some(5.0)),
            record("second", 10.0, 9.0, Some(1.0)),
            record("third", 10.0, 9.0, Some(1.0)),
        ];
        let ranked = rank_by_transmission(&input).unwrap();
        assert_eq!(names(&ranked), ["top", "first", "second", "third"]);
    }

    #[test]
    fn nan_sorts_last() {
        let input = [
            record("nan", 10.0, 9.0, Some(f64::NAN)),
            record("low", 10.0, 9.0, Some(0.1)),
        ];
        assert_eq!(names(&rank_by_transmission(&input).unwrap()), ["low", "nan"]);
    }

    #[test]
    fn ranking_without_metrics_fails() {
        let input = [record("a", 10.0, 9.0, None)];
        assert!(matches!(
            rank_by_transmission(&input),
            Err(CatalogueError::RankingUnavailable)
        ));
    }
}
