//! URL round-trip properties for the navigation state.

mod common;

use common::harness;
use proptest::prelude::*;
use qlog_dashboard::format::Severity;
use qlog_dashboard::routing::{DateSpan, Filters, History, View};

fn view() -> impl Strategy<Value = View> {
    prop_oneof![
        Just(View::Dashboard),
        Just(View::Logs),
        Just(View::Shared),
        Just(View::ViewDisplay),
        Just(View::Listeners),
        Just(View::Views),
        Just(View::Modules),
        Just(View::Devices),
        Just(View::Settings),
        "[a-z][a-z0-9_-]{0,11}".prop_map(View::other),
    ]
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof!["\\PC{0,16}", "[ &+%=?#/aé漢]{0,8}"]
}

fn date_range() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1h".to_string()),
        Just("24h".to_string()),
        Just("7d".to_string()),
        Just("custom".to_string()),
        "\\PC{1,12}",
    ]
}

fn filters() -> impl Strategy<Value = Filters> {
    (
        proptest::option::of(0u8..=7),
        text(),
        text(),
        text(),
        date_range(),
        proptest::option::of(("\\PC{1,12}", "\\PC{1,12}")),
        text(),
    )
        .prop_map(
            |(severity, device, device_type, event_type, date_range, span, search)| Filters {
                severity: severity.and_then(Severity::new),
                device,
                device_type,
                event_type,
                date_range: Some(date_range),
                date_span: span.and_then(|(from, to)| DateSpan::new(from, to)),
                search,
            },
        )
}

proptest! {
    #[test]
    fn prop_state_reloads_from_its_own_url(
        view in view(),
        filters in filters(),
        page in 0usize..10_000,
    ) {
        let h = harness("/");
        h.sync.load_state_from_url();
        h.sync.navigate(view);
        h.sync.apply_filters(filters);
        h.sync.set_page(page);
        let original = h.sync.state().read().clone();

        let reloaded = harness(&h.history.location().href());
        reloaded.sync.load_state_from_url();
        let restored = reloaded.sync.state().read().clone();

        prop_assert_eq!(restored, original);
    }

    #[test]
    fn prop_other_view_names_never_shadow_known_ones(name in "\\PC{0,12}") {
        let view = View::other(name.as_str());
        prop_assert_eq!(View::parse(view.as_str()), view);
    }
}
