use dev_utils::{build_example_timetable, get_example_query};
use mcraptor::query::{ARRIVAL_INDEX, IVTT_INDEX, STOP_COUNT_INDEX};
use mcraptor::run_query;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Synthetic network: a handful of routes feeding a shared interchange.
    let (timetable, footpaths, source, destination) = build_example_timetable(8, 6, 12);
    let query = get_example_query(source, destination);

    let store = run_query(&timetable, &footpaths, &query)?;

    if store.is_destination_unreachable(timetable.stop_idx(destination).unwrap()) {
        println!("destination unreachable within {} transfers", query.max_transfer);
        return Ok(());
    }

    for (round, label) in store.terminal_labels(timetable.stop_idx(destination).unwrap()) {
        println!(
            "round {round}: arrival={} stop_count={} ivtt={} trip={:?}",
            label.criteria[ARRIVAL_INDEX], label.criteria[STOP_COUNT_INDEX], label.criteria[IVTT_INDEX], label.trip
        );
    }

    Ok(())
}
