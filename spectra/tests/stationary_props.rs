mod helpers;

use helpers::*;
use proptest::prelude::*;
use spectra::{RunOutcome, SourceRequest};
use spectra_core::{Company, Period, Phase};
use spectra_mock::MockBehavior;

fn rt() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_stationary_input_blocks_the_linear_combination(
        first in prop::sample::select(Company::ALL.to_vec()),
        second in prop::sample::select(Company::ALL.to_vec()),
        flags in (any::<bool>(), any::<bool>()).prop_filter("one stationary", |(a, b)| *a || *b),
        len in 1usize..60,
    ) {
        let (outcome, phase, lc_calls) = rt().block_on(async {
            let (pipeline, ctl) = dynamic_pipeline();
            for c in [first, second] {
                ctl.set_series_behavior(c.code(), MockBehavior::Return(dated(c.code(), trend(1.0, len))))
                    .await;
            }
            ctl.push_stationarity(stationary(flags.0)).await;
            ctl.push_stationarity(stationary(flags.1)).await;

            let outcome = pipeline
                .submit(SourceRequest::Fetch { first, second, period: Period::Half })
                .await;
            (outcome, pipeline.state().phase(), ctl.linear_combination_calls().await.len())
        });

        let offender = if flags.0 { first } else { second };
        let expected = format!("«{}» является стационарным временным рядом", offender.label());
        prop_assert_eq!(outcome, RunOutcome::Failed(expected));
        prop_assert_eq!(phase, Phase::Error);
        prop_assert_eq!(lc_calls, 0);
    }
}
