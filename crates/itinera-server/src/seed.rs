//! Demo itineraries for a fresh store.
//!
//! One trip per region for every length from 2 to 8 nights. Day `n` of each
//! trip gets the region's `n`th hotel and activity (cycling), plus a taxi
//! from the airport on the first day and a ferry from the dock afterwards.

use itinera_core::{
  ItineraryReader, ItineraryWriter,
  itinerary::{AccommodationSpec, ActivitySpec, DaySpec, TransferSpec, TripSpec},
  store::ItineraryStore,
};

struct Region {
  name:       &'static str,
  hotels:     &'static [&'static str],
  activities: &'static [&'static str],
}

const REGIONS: &[Region] = &[
  Region {
    name:       "Phuket",
    hotels:     &[
      "Katathani Phuket Beach Resort",
      "Outrigger Laguna Phuket Beach Resort",
      "The Slate Phuket",
    ],
    activities: &[
      "Beach Day at Kata Noi",
      "Phi Phi Islands Tour",
      "Big Buddha Visit",
      "Old Phuket Town Walk",
    ],
  },
  Region {
    name:       "Krabi",
    hotels:     &[
      "Rayavadee",
      "Centara Grand Beach Resort & Villas Krabi",
      "Railay Beach Resort & Spa",
    ],
    activities: &[
      "Railay Beach Climbing",
      "Emerald Pool Visit",
      "Island Hopping Tour",
      "Tiger Cave Temple Climb",
    ],
  },
];

const NIGHTS: std::ops::RangeInclusive<u32> = 2..=8;

fn demo_day(region: &Region, day_number: u32) -> DaySpec {
  let idx = (day_number - 1) as usize;
  let hotel = region.hotels[idx % region.hotels.len()];
  let activity = region.activities[idx % region.activities.len()];

  let (mode, from_location) = if day_number == 1 {
    ("Taxi", format!("{} Airport", region.name))
  } else {
    ("Ferry", format!("{} Island Dock", region.name))
  };

  DaySpec {
    day_number,
    date: None,
    accommodations: vec![AccommodationSpec {
      name:     hotel.to_owned(),
      location: region.name.to_owned(),
    }],
    transfers: vec![TransferSpec {
      mode: mode.to_owned(),
      from_location,
      to_location: hotel.to_owned(),
    }],
    activities: vec![ActivitySpec {
      name:        activity.to_owned(),
      description: Some(format!("Enjoy a {}", activity.to_lowercase())),
    }],
  }
}

/// Every demo trip, regions in order and shortest first within each.
pub fn demo_trips() -> Vec<TripSpec> {
  REGIONS
    .iter()
    .flat_map(|region| {
      NIGHTS.map(move |nights| TripSpec {
        region:          region.name.to_owned(),
        name:            format!("{nights}-Night {} Adventure", region.name),
        duration_nights: nights,
        days:            (1..=nights).map(|n| demo_day(region, n)).collect(),
      })
    })
    .collect()
}

/// Write the demo trips unless the store already holds any trip. Returns the
/// number of trips written.
pub async fn seed_if_empty<S>(
  writer: &ItineraryWriter<S>,
  reader: &ItineraryReader<S>,
) -> itinera_core::Result<usize>
where
  S: ItineraryStore,
{
  let existing = reader.list_all().await?.len();
  if existing > 0 {
    tracing::info!(existing, "store already has trips; skipping demo data");
    return Ok(0);
  }

  let trips = demo_trips();
  let count = trips.len();
  for spec in trips {
    writer.create(spec).await?;
  }
  tracing::info!(count, "inserted demo data");
  Ok(count)
}
