use std::sync::mpsc;

use chrono::NaiveDate;
use eframe::egui::Color32;

use super::date_range::DateRangeElement;
use super::element::FilterElement;
use super::multi_select::MultiSelect;
use super::{FilterKind, FilterOptions, FilterPanel, RowData, INDEX_KEY};
use crate::ui_constants::MAX_FILTER_ROWS;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn options() -> FilterOptions {
    FilterOptions {
        min_date: date(2023, 1, 1),
        max_date: date(2023, 3, 31),
        countries: vec!["Denmark".into(), "Germany".into(), "India".into()],
        continents: vec!["Asia".into(), "Europe".into()],
        page_names: vec!["about".into(), "home".into()],
    }
}

fn palette() -> Vec<Color32> {
    vec![Color32::RED, Color32::GREEN, Color32::BLUE]
}

/// Panel with options and palette applied, plus subscribed data/resize
/// receivers (drained of the startup emissions).
fn ready_panel() -> (
    FilterPanel,
    mpsc::Receiver<Vec<RowData>>,
    mpsc::Receiver<()>,
) {
    let mut panel = FilterPanel::new();
    let (data_tx, data_rx) = mpsc::channel();
    let (resize_tx, resize_rx) = mpsc::channel();
    panel.on_data_change(data_tx);
    panel.on_resize(resize_tx);
    panel.set_options(options());
    panel.set_palette(palette());
    drain_data(&data_rx);
    drain_resize(&resize_rx);
    (panel, data_rx, resize_rx)
}

fn drain_data(rx: &mpsc::Receiver<Vec<RowData>>) -> Vec<Vec<RowData>> {
    let mut out = Vec::new();
    while let Ok(d) = rx.try_recv() {
        out.push(d);
    }
    out
}

fn drain_resize(rx: &mpsc::Receiver<()>) -> usize {
    let mut n = 0;
    while rx.try_recv().is_ok() {
        n += 1;
    }
    n
}

fn country_select(panel: &mut FilterPanel, row: usize) -> &mut MultiSelect {
    panel.rows_mut()[row]
        .element_mut(FilterKind::Countries)
        .as_any_mut()
        .downcast_mut::<MultiSelect>()
        .unwrap()
}

fn assert_contiguous_indices(panel: &FilterPanel) {
    for (i, row) in panel.rows().iter().enumerate() {
        assert_eq!(row.index(), i);
        assert_eq!(row.color(), palette().get(i).copied());
    }
}

#[test]
fn panel_starts_loading_with_add_disabled() {
    let panel = FilterPanel::new();
    assert!(!panel.is_ready());
    assert!(!panel.can_add());
    assert_eq!(panel.row_count(), 0);
}

#[test]
fn first_row_is_created_when_options_arrive() {
    let mut panel = FilterPanel::new();
    panel.set_options(options());
    assert!(panel.is_ready());
    assert!(panel.can_add());
    assert_eq!(panel.row_count(), 1);
}

#[test]
fn add_before_options_is_refused() {
    let mut panel = FilterPanel::new();
    panel.add_row();
    assert_eq!(panel.row_count(), 0);
}

#[test]
fn initial_aggregate_matches_template_defaults() {
    let (panel, _data_rx, _resize_rx) = ready_panel();
    let data = panel.aggregate_data();
    assert_eq!(data.len(), 1);
    let row = &data[0];
    assert_eq!(row[INDEX_KEY], vec!["0".to_string()]);
    assert!(row["countries"].is_empty());
    assert!(row["continents"].is_empty());
    assert!(row["pageNames"].is_empty());
    assert_eq!(
        row["dateRange"],
        vec!["2023-01-01".to_string(), "2023-03-31".to_string()]
    );
}

#[test]
fn indices_stay_contiguous_across_adds_and_deletes() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    panel.add_row();
    panel.add_row();
    panel.add_row();
    assert_eq!(panel.row_count(), 4);
    assert_contiguous_indices(&panel);

    panel.rows()[2].request_delete();
    panel.pump();
    assert_eq!(panel.row_count(), 3);
    assert_contiguous_indices(&panel);

    panel.rows()[0].request_delete();
    panel.pump();
    assert_eq!(panel.row_count(), 2);
    assert_contiguous_indices(&panel);
}

#[test]
fn add_is_capped_at_max_rows() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    for _ in 0..10 {
        panel.add_row();
    }
    assert_eq!(panel.row_count(), MAX_FILTER_ROWS);
    assert!(!panel.can_add());
}

#[test]
fn delete_reopens_capacity() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    while panel.can_add() {
        panel.add_row();
    }
    assert_eq!(panel.row_count(), MAX_FILTER_ROWS);

    panel.rows()[3].request_delete();
    panel.pump();
    assert!(panel.can_add());
    panel.add_row();
    assert_eq!(panel.row_count(), MAX_FILTER_ROWS);
}

#[test]
fn singleton_delete_is_refused() {
    let (mut panel, data_rx, _resize_rx) = ready_panel();
    assert_eq!(panel.row_count(), 1);
    assert!(!panel.rows()[0].delete_enabled());

    // Even a delete signal that bypasses the disabled affordance must not
    // drop the last row.
    panel.rows()[0].request_delete();
    panel.pump();
    assert_eq!(panel.row_count(), 1);
    assert!(drain_data(&data_rx).is_empty());
}

#[test]
fn delete_affordances_follow_row_count() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    panel.add_row();
    assert!(panel.rows().iter().all(|r| r.delete_enabled()));

    panel.rows()[1].request_delete();
    panel.pump();
    assert_eq!(panel.row_count(), 1);
    assert!(!panel.rows()[0].delete_enabled());
}

#[test]
fn deleting_middle_row_preserves_survivor_order() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    panel.add_row();
    panel.add_row();
    let ids: Vec<_> = panel.rows().iter().map(|r| r.id()).collect();

    panel.rows()[1].request_delete();
    panel.pump();

    let survivors: Vec<_> = panel.rows().iter().map(|r| r.id()).collect();
    assert_eq!(survivors, vec![ids[0], ids[2]]);
    assert_contiguous_indices(&panel);
}

#[test]
fn widget_change_emits_single_aggregate() {
    let (mut panel, data_rx, _resize_rx) = ready_panel();
    panel.add_row();
    drain_data(&data_rx);

    assert!(country_select(&mut panel, 1).toggle("India"));
    panel.pump();

    let emissions = drain_data(&data_rx);
    assert_eq!(emissions.len(), 1);
    let data = &emissions[0];
    assert_eq!(data.len(), 2);
    assert_eq!(data[1]["countries"], vec!["India".to_string()]);
    assert!(data[0]["countries"].is_empty());
}

#[test]
fn several_changes_in_one_frame_coalesce() {
    let (mut panel, data_rx, _resize_rx) = ready_panel();

    let select = country_select(&mut panel, 0);
    select.toggle("Denmark");
    select.toggle("India");
    panel.pump();

    assert_eq!(drain_data(&data_rx).len(), 1);
}

#[test]
fn structural_change_emits_resize_then_data() {
    let (mut panel, data_rx, resize_rx) = ready_panel();
    panel.add_row();
    assert_eq!(drain_resize(&resize_rx), 1);
    assert_eq!(drain_data(&data_rx).len(), 1);

    panel.rows()[0].request_delete();
    panel.pump();
    assert_eq!(drain_resize(&resize_rx), 1);
    assert_eq!(drain_data(&data_rx).len(), 1);
}

#[test]
fn result_counts_update_row_display() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    panel.add_row();

    panel.apply_result_counts(&[0, 5]);
    assert_eq!(panel.rows()[0].count(), 0);
    assert_eq!(panel.rows()[1].count(), 5);
}

#[test]
fn count_length_mismatch_is_tolerated() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    panel.add_row();

    panel.apply_result_counts(&[7]);
    assert_eq!(panel.rows()[0].count(), 7);
    assert_eq!(panel.rows()[1].count(), 0);

    panel.apply_result_counts(&[1, 2, 3, 4]);
    assert_eq!(panel.rows()[0].count(), 1);
    assert_eq!(panel.rows()[1].count(), 2);
}

#[test]
fn palette_may_arrive_after_rows_exist() {
    let mut panel = FilterPanel::new();
    panel.set_options(options());
    panel.add_row();
    assert!(panel.rows().iter().all(|r| r.color().is_none()));

    panel.set_palette(palette());
    assert_contiguous_indices(&panel);

    // Re-applying the palette is idempotent
    panel.set_palette(palette());
    assert_contiguous_indices(&panel);
}

#[test]
fn palette_may_arrive_before_rows_exist() {
    let mut panel = FilterPanel::new();
    panel.set_palette(palette());
    panel.set_options(options());
    assert_eq!(panel.rows()[0].color(), Some(Color32::RED));
}

#[test]
fn rows_beyond_palette_length_have_no_color() {
    let (mut panel, _data_rx, _resize_rx) = ready_panel();
    while panel.can_add() {
        panel.add_row();
    }
    // Palette has 3 entries; rows 3..6 fall off its end
    assert!(panel.rows()[2].color().is_some());
    assert!(panel.rows()[3].color().is_none());
    assert!(panel.rows()[5].color().is_none());
}

#[test]
fn multi_select_values_follow_option_order() {
    let mut select = MultiSelect::new(
        vec!["Denmark".into(), "Germany".into(), "India".into()],
        "Country",
        "test_countries".into(),
    );
    assert!(select.toggle("India"));
    assert!(select.toggle("Denmark"));
    assert_eq!(
        select.values(),
        vec!["Denmark".to_string(), "India".to_string()]
    );

    assert!(select.toggle("Denmark"));
    assert_eq!(select.values(), vec!["India".to_string()]);
    assert!(!select.toggle("Atlantis"));
}

#[test]
fn multi_select_change_signal_fans_out() {
    let mut select = MultiSelect::new(vec!["Asia".into(), "Europe".into()], "Continent", "t".into());
    let (tx1, rx1) = mpsc::channel();
    let (tx2, rx2) = mpsc::channel();
    select.on_change(tx1);
    select.on_change(tx2);

    select.toggle("Asia");
    assert!(rx1.try_recv().is_ok());
    assert!(rx2.try_recv().is_ok());
}

#[test]
fn date_range_clamps_to_bounds() {
    let mut range = DateRangeElement::new(date(2023, 1, 1), date(2023, 3, 31), "t".into());
    let (tx, rx) = mpsc::channel();
    range.on_change(tx);

    range.set_range(date(2020, 6, 1), date(2030, 6, 1));
    assert_eq!(range.start(), date(2023, 1, 1));
    assert_eq!(range.end(), date(2023, 3, 31));
    assert!(rx.try_recv().is_ok());

    range.set_range(date(2023, 2, 1), date(2023, 2, 15));
    assert_eq!(
        range.values(),
        vec!["2023-02-01".to_string(), "2023-02-15".to_string()]
    );
}

#[test]
fn row_data_uses_wire_keys() {
    let (panel, _data_rx, _resize_rx) = ready_panel();
    let data = panel.rows()[0].data();
    let keys: Vec<_> = data.keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["continents", "countries", "dateRange", "index", "pageNames"]
    );
}
