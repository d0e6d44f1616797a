//! Consistency tests on synthetic gridded fluxes.
//!
//! The fluxes are built on a `[time, lat, lon]` grid with clear-sky fields derived
//! from the all-sky fields, so both energy budget derivations must agree.

use approx::assert_relative_eq;
use ndarray::{Array3, IxDyn};
use radiag_components::cre::{cloud_radiative_effect, cre_profile};
use radiag_components::energy_budget::{energy_budget, latent_heating, radiative_terms};
use radiag_core::field::{Field, FloatValue, FluxSet, Sky};
use radiag_core::parameters::DiagnosticParameters;
use radiag_core::spatial::{area_weighted_mean, global_mean, LatitudeWeights, MeanMethod};

const N_TIME: usize = 3;
const N_LON: usize = 12;

fn latitudes() -> Vec<FloatValue> {
    (0..18).map(|i| -85.0 + 10.0 * i as FloatValue).collect()
}

/// Build a field from a function of (time index, latitude in degrees, longitude index)
fn grid(f: impl Fn(usize, FloatValue, usize) -> FloatValue) -> Field {
    let lats = latitudes();
    Array3::from_shape_fn((N_TIME, lats.len(), N_LON), |(t, i, j)| f(t, lats[i], j)).into_dyn()
}

/// Cloud fraction pattern in [0, 1]
fn cloudiness(t: usize, lat: FloatValue, lon: usize) -> FloatValue {
    let wave = (lon as FloatValue * 0.5 + t as FloatValue).sin();
    (0.6 + 0.3 * (lat.to_radians() * 3.0).cos() * wave).clamp(0.0, 1.0)
}

fn synthetic_fluxes() -> FluxSet {
    let insolation = |_t: usize, lat: FloatValue, _lon: usize| 420.0 * lat.to_radians().cos();
    let surface_temp_emission = |t: usize, lat: FloatValue, _lon: usize| {
        310.0 + 90.0 * lat.to_radians().cos() + t as FloatValue
    };

    // Clear-sky fields
    let swdt = grid(insolation);
    let swut_cs = grid(|t, lat, lon| 0.12 * insolation(t, lat, lon));
    let swds_cs = grid(|t, lat, lon| 0.75 * insolation(t, lat, lon));
    let swus_cs = grid(|t, lat, lon| 0.15 * 0.75 * insolation(t, lat, lon));
    let lwus = grid(surface_temp_emission);
    let lwut_cs = grid(|t, lat, lon| 0.66 * surface_temp_emission(t, lat, lon));
    let lwds_cs = grid(|t, lat, lon| 0.78 * surface_temp_emission(t, lat, lon));

    // Clouds reflect more shortwave, trap more longwave
    let c = cloudiness;
    let swut = grid(|t, lat, lon| (0.12 + 0.25 * c(t, lat, lon)) * insolation(t, lat, lon));
    let swds = grid(|t, lat, lon| (0.75 - 0.30 * c(t, lat, lon)) * insolation(t, lat, lon));
    let swus = grid(|t, lat, lon| {
        0.15 * (0.75 - 0.30 * c(t, lat, lon)) * insolation(t, lat, lon)
    });
    let lwut = grid(|t, lat, lon| {
        (0.66 - 0.08 * c(t, lat, lon)) * surface_temp_emission(t, lat, lon)
    });
    let lwds = grid(|t, lat, lon| {
        (0.78 + 0.05 * c(t, lat, lon)) * surface_temp_emission(t, lat, lon)
    });

    FluxSet::from_keys(vec![
        ("swdt", swdt.clone()),
        ("swut", swut),
        ("swds", swds),
        ("swus", swus),
        ("lwut", lwut),
        ("lwus", lwus.clone()),
        ("lwds", lwds),
        ("swdt_cs", swdt),
        ("swut_cs", swut_cs),
        ("swds_cs", swds_cs),
        ("swus_cs", swus_cs),
        ("lwut_cs", lwut_cs),
        ("lwus_cs", lwus),
        ("lwds_cs", lwds_cs),
    ])
    .unwrap()
}

mod energy_budget_consistency {
    use super::*;

    #[test]
    fn methods_agree_on_every_cell() {
        let result = energy_budget(&synthetic_fluxes()).unwrap();
        assert_eq!(result.flux_divergence.shape(), &[N_TIME, 18, N_LON]);

        for (m1, m2) in result
            .flux_divergence
            .iter()
            .zip(result.cre_decomposition.iter())
        {
            assert_relative_eq!(*m1, *m2, max_relative = 1e-6, epsilon = 1e-9);
        }
        assert!(result.check_consistency(&DiagnosticParameters::default()));
    }

    #[test]
    fn methods_agree_in_the_global_mean() {
        let weights = LatitudeWeights::cosine(&latitudes()).unwrap();
        let result = energy_budget(&synthetic_fluxes()).unwrap();

        // Leading time axis is preserved by the area-weighted mean
        let per_time = weights.mean(&result.flux_divergence).unwrap();
        assert_eq!(per_time.shape(), &[N_TIME]);
        let per_time_2 = weights.mean(&result.cre_decomposition).unwrap();
        for t in 0..N_TIME {
            assert_relative_eq!(per_time[[t]], per_time_2[[t]], max_relative = 1e-6);
        }

        // The column loses energy radiatively in every time step
        assert!(per_time.iter().all(|&v| v < 0.0));
    }

    #[test]
    fn clouds_warm_the_column_in_longwave() {
        let fluxes = synthetic_fluxes();
        let all = radiative_terms(&fluxes, Sky::All).unwrap();
        let clear = radiative_terms(&fluxes, Sky::Clear).unwrap();
        let weights = LatitudeWeights::cosine(&latitudes()).unwrap();

        let all_lw = weights.mean(&all.longwave).unwrap();
        let clear_lw = weights.mean(&clear.longwave).unwrap();
        for t in 0..N_TIME {
            assert!(all_lw[[t]] > clear_lw[[t]]);
        }
    }

    #[test]
    fn latent_heating_balances_radiation() {
        let fluxes = synthetic_fluxes();
        let terms = radiative_terms(&fluxes, Sky::All).unwrap();
        let sensible_heat = grid(|_, lat, _| 20.0 * lat.to_radians().cos());

        let lp = latent_heating(&terms, &sensible_heat).unwrap();
        let residual = &(&terms.net + &lp) + &sensible_heat;
        assert!(residual.iter().all(|v| v.abs() < 1e-9));
    }
}

mod cloud_radiative_effect_properties {
    use super::*;

    #[test]
    fn profile_terms_sum() {
        let profile = cre_profile(&synthetic_fluxes()).unwrap();
        for cre in [&profile.toa, &profile.surface, &profile.atmosphere] {
            assert_eq!(cre.net, &cre.shortwave + &cre.longwave);
        }
    }

    #[test]
    fn shortwave_cre_is_positive_where_clouds_reflect() {
        // Clear minus all: clouds reduce the net downward shortwave at the top of
        // atmosphere wherever the sun shines
        let profile = cre_profile(&synthetic_fluxes()).unwrap();
        assert!(profile.toa.shortwave.iter().all(|&v| v >= 0.0));
        assert!(profile.toa.longwave.iter().all(|&v| v <= 0.0));
    }

    #[test]
    fn global_mean_summary_matches_field_means() {
        let weights = LatitudeWeights::cosine(&latitudes()).unwrap();
        let profile = cre_profile(&synthetic_fluxes()).unwrap();

        // Single time slice, so every term reduces to a scalar
        let slice = |field: &Field| field.index_axis(ndarray::Axis(0), 0).to_owned();
        let toa = cloud_radiative_effect(
            &slice(&profile.toa.shortwave),
            &Field::zeros(IxDyn(&[18, N_LON])),
            &slice(&profile.toa.longwave),
            &Field::zeros(IxDyn(&[18, N_LON])),
        )
        .unwrap();

        let summary = toa.global_mean(&weights, MeanMethod::WeightedSum).unwrap();
        assert_relative_eq!(
            summary.net,
            summary.shortwave + summary.longwave,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            summary.net,
            global_mean(&slice(&profile.toa.net), &weights).unwrap(),
            epsilon = 1e-9
        );
    }
}

mod area_weighting {
    use super::*;

    #[test]
    fn weight_rescaling_does_not_change_the_mean() {
        let field = synthetic_fluxes()
            .get("lwut".parse().unwrap())
            .unwrap()
            .clone();
        let weights: Vec<FloatValue> = latitudes()
            .iter()
            .map(|lat| lat.to_radians().cos())
            .collect();
        let scaled: Vec<FloatValue> = weights.iter().map(|w| w * 1000.0).collect();

        let a = area_weighted_mean(&field, &weights).unwrap();
        let b = area_weighted_mean(&field, &scaled).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
    }

    #[test]
    fn trapezoidal_and_weighted_sum_are_close_on_a_fine_grid() {
        let lats: Vec<FloatValue> = (0..181).map(|i| -90.0 + i as FloatValue).collect();
        let weights = LatitudeWeights::cosine(&lats).unwrap();
        let field = ndarray::Array1::from_iter(lats.iter().map(|lat| 300.0 - 0.01 * lat * lat))
            .into_dyn();

        let summed = weights.mean_with(&field, MeanMethod::WeightedSum).unwrap();
        let integrated = weights.mean_with(&field, MeanMethod::Trapezoidal).unwrap();
        assert_relative_eq!(
            summed[IxDyn(&[])],
            integrated[IxDyn(&[])],
            max_relative = 1e-3
        );
    }
}
