//! Fuzz test for persisted flight and location records
//!
//! Arbitrary bytes are decoded as records and rebuilt into owners. Decoding
//! and rebuilding must never panic, and any owner that rebuilds must respect
//! its link shapes and write back the snapshots it was read from.
//!
//! Run with: cargo +nightly fuzz run record_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use wingman_core::{Link, Resolvers, RoleTag};
use wingman_storage::{FlightRecord, LocationRecord};

fn check_shape<R: RoleTag, T: wingman_core::Item + 'static>(link: &Link<R, T>) {
    for (role, ids) in link.snapshot() {
        let capacity = link.shape().capacity_of(role).expect("role inside shape");
        assert!(ids.len() <= capacity, "{role} over capacity");
        assert!(!ids.is_empty(), "{role} kept empty");
    }
}

fuzz_target!(|data: &[u8]| {
    let resolvers = Resolvers::detached();

    if let Ok(record) = serde_json::from_slice::<FlightRecord>(data) {
        if let Ok(flight) = record.into_flight(&resolvers) {
            check_shape(&flight.pilot_link);
            check_shape(&flight.crew_link);
            check_shape(&flight.plane_link);
            check_shape(&flight.location_link);

            let written = FlightRecord::from(&flight);
            let reread = written
                .into_flight(&resolvers)
                .expect("a written flight rebuilds");
            assert_eq!(reread, flight);
        }
    }

    if let Ok(record) = serde_json::from_slice::<LocationRecord>(data) {
        if let Ok(location) = record.into_location(&resolvers) {
            check_shape(&location.crew_link);
            check_shape(&location.pilot_link);
            check_shape(&location.plane_link);

            let written = LocationRecord::from(&location);
            let reread = written
                .into_location(&resolvers)
                .expect("a written location rebuilds");
            assert_eq!(reread, location);
        }
    }
});
