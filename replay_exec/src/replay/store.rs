//! Recorded trajectory storage and loading

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use csv::{ByteRecord, ReaderBuilder, Trim};
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::{fs::File, io::Read, path::Path};

// Internal
use super::{PathPoint, Twist};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Minimum number of points a trajectory must hold before it can be replayed.
pub const MIN_USABLE_POINTS: usize = 2;

/// Number of fields every record of the trajectory file must contain.
pub const NUM_RECORD_FIELDS: usize = 10;

/// Default period between records used when the file carries no time column.
pub const DEFAULT_RECORD_PERIOD_S: f64 = 0.01;

/// Names of the record fields in file order. The last one is optional.
const FIELD_NAMES: [&str; NUM_RECORD_FIELDS + 1] = [
    "latitude", "longitude", "altitude", "yaw", "vx", "vy", "vz", "wx", "wy", "wz", "time",
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The recorded reference trajectory.
///
/// The store is filled once during initialisation and only read afterwards, any number of
/// planning cycles may borrow it at the same time.
#[derive(Debug, Clone)]
pub struct TrajectoryStore {
    points: Vec<PathPoint>,

    /// Period between records assumed when the source has no time column.
    record_period_s: f64,
}

/// Summary of a successful load.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of points now held by the store
    pub num_points: usize,

    /// Number of records which were rejected and skipped
    pub num_malformed: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while loading a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be opened or read. The store is left untouched.
    #[error("Cannot read the trajectory source: {0}")]
    Unreadable(std::io::Error),

    /// A single record could not be parsed. The record is skipped and loading continues.
    #[error("Malformed trajectory record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: RecordError },
}

/// The reason a record was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("field {index} ({name}) is not a finite number: {value:?}")]
    NotNumeric {
        index: usize,
        name: &'static str,
        value: String,
    },

    #[error("time {found} s is earlier than the previous record at {previous} s")]
    TimeDecreasing { previous: f64, found: f64 },

    #[error("could not decode the record: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for TrajectoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_PERIOD_S)
    }
}

impl TrajectoryStore {
    /// Create a new empty store.
    ///
    /// `record_period_s` is the time between records assumed for sources which do not carry a time
    /// column.
    pub fn new(record_period_s: f64) -> Self {
        Self {
            points: Vec::new(),
            record_period_s,
        }
    }

    /// Load the trajectory file at the given path, replacing the current trajectory.
    ///
    /// If the file cannot be opened `LoadError::Unreadable` is returned and the current trajectory
    /// is kept. See [`TrajectoryStore::load_from_reader`] for the handling of the content.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadSummary, LoadError> {
        let file = File::open(path.as_ref()).map_err(LoadError::Unreadable)?;

        info!("Loading trajectory from {:?}", path.as_ref());

        self.load_from_reader(file)
    }

    /// Load a trajectory from a reader, replacing the current trajectory.
    ///
    /// The first line is a header and is skipped. Reading stops at the first blank line. Records
    /// which cannot be parsed (including those which are not valid UTF-8, or whose time goes
    /// backwards) are logged and skipped, a source with no valid records leaves the store empty.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> Result<LoadSummary, LoadError> {
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(LoadError::Unreadable)?;

        let (points, num_malformed) = parse_trajectory(&contents, self.record_period_s);

        // Nothing can fail from here on so the old trajectory can be replaced
        self.points = points;

        let summary = LoadSummary {
            num_points: self.points.len(),
            num_malformed,
        };

        info!(
            "Trajectory loaded: {} points, {} malformed records skipped",
            summary.num_points, summary.num_malformed
        );

        if !self.is_usable() {
            warn!(
                "The loaded trajectory has {} points, at least {} are needed to replay it",
                self.points.len(),
                MIN_USABLE_POINTS
            );
        }

        Ok(summary)
    }

    /// All points of the trajectory in recording order.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true if the trajectory holds enough points to be replayed.
    pub fn is_usable(&self) -> bool {
        self.points.len() >= MIN_USABLE_POINTS
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse the content of a trajectory file into points.
///
/// Returns the points and the number of rejected records.
fn parse_trajectory(contents: &[u8], record_period_s: f64) -> (Vec<PathPoint>, usize) {
    let body = recording_body(contents);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body);

    let mut points = Vec::new();
    let mut num_malformed = 0;

    for result in reader.byte_records() {
        // Line numbers are reported in file terms, the header is line 1
        let parsed = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line() + 1).unwrap_or(0);
                parse_record(&record, points.len(), record_period_s)
                    .and_then(|point| check_time_order(points.last(), point))
                    .map_err(|reason| (line, reason))
            }
            Err(e) => {
                let line = e.position().map(|p| p.line() + 1).unwrap_or(0);
                Err((line, RecordError::Decode(e.to_string())))
            }
        };

        match parsed {
            Ok(point) => points.push(point),
            Err((line, reason)) => {
                num_malformed += 1;
                warn!("{}", LoadError::MalformedRecord { line, reason });
            }
        }
    }

    debug!("Parsed {} trajectory records", points.len() + num_malformed);

    (points, num_malformed)
}

/// Get the records section of a trajectory file: everything after the header line and before the
/// first blank line.
fn recording_body(contents: &[u8]) -> &[u8] {
    let mut lines = contents.split_inclusive(|b| *b == b'\n');

    let header_len = match lines.next() {
        Some(h) => h.len(),
        None => return &[],
    };

    let mut end = header_len;
    for line in lines {
        if line.iter().all(u8::is_ascii_whitespace) {
            break;
        }
        end += line.len();
    }

    &contents[header_len..end]
}

/// Parse a single record.
///
/// `index` is the index the point will have in the trajectory, used to derive the time when the
/// record has no usable time field.
fn parse_record(
    record: &ByteRecord,
    index: usize,
    record_period_s: f64,
) -> Result<PathPoint, RecordError> {
    if record.len() < NUM_RECORD_FIELDS {
        return Err(RecordError::TooFewFields {
            expected: NUM_RECORD_FIELDS,
            found: record.len(),
        });
    }

    let field = |i: usize| -> Result<f64, RecordError> {
        parse_number(&record[i]).ok_or_else(|| RecordError::NotNumeric {
            index: i,
            name: FIELD_NAMES[i],
            value: String::from_utf8_lossy(&record[i]).into_owned(),
        })
    };

    // Anything after the fixed fields is only used if it holds a time
    let time_s = record
        .get(NUM_RECORD_FIELDS)
        .and_then(parse_number)
        .unwrap_or(index as f64 * record_period_s);

    Ok(PathPoint {
        latitude: field(0)?,
        longitude: field(1)?,
        altitude: field(2)?,
        yaw: field(3)?,
        time_s,
        velocity: Twist {
            linear: Vector3::new(field(4)?, field(5)?, field(6)?),
            angular: Vector3::new(field(7)?, field(8)?, field(9)?),
        },
    })
}

/// Parse a field as a finite number.
fn parse_number(field: &[u8]) -> Option<f64> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Reject a point recorded before the previously accepted one.
fn check_time_order(
    previous: Option<&PathPoint>,
    point: PathPoint,
) -> Result<PathPoint, RecordError> {
    match previous {
        Some(p) if point.time_s < p.time_s => Err(RecordError::TimeDecreasing {
            previous: p.time_s,
            found: point.time_s,
        }),
        _ => Ok(point),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    const HEADER: &str = "latitude,longitude,altitude,yaw,vx,vy,vz,wx,wy,wz\n";

    fn record(i: usize) -> String {
        let f = i as f64;
        format!(
            "{},{},0.5,0.1,1.0,0.0,0.0,0.0,0.0,0.2\n",
            f,
            2.0 * f
        )
    }

    #[test]
    fn test_load_valid_records_in_order() {
        let mut data = String::from(HEADER);
        for i in 0..5 {
            data.push_str(&record(i));
        }

        let mut store = TrajectoryStore::default();
        let summary = store.load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                num_points: 5,
                num_malformed: 0
            }
        );
        assert_eq!(store.len(), 5);
        assert!(store.is_usable());

        for (i, p) in store.points().iter().enumerate() {
            assert_eq!(p.latitude, i as f64);
            assert_eq!(p.longitude, 2.0 * i as f64);
            assert_eq!(p.altitude, 0.5);
            assert_eq!(p.yaw, 0.1);
            assert_eq!(p.velocity.linear, Vector3::new(1.0, 0.0, 0.0));
            assert_eq!(p.velocity.angular, Vector3::new(0.0, 0.0, 0.2));
            assert_relative_eq!(p.time_s, i as f64 * DEFAULT_RECORD_PERIOD_S);
        }
    }

    #[test]
    fn test_load_time_column() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "0,0,0,0,0,0,0,0,0,0,10.0\n",
            "1,0,0,0,0,0,0,0,0,0,10.5\n"
        );

        let mut store = TrajectoryStore::new(1.0);
        store.load_from_reader(data.as_bytes()).unwrap();

        let times: Vec<f64> = store.points().iter().map(|p| p.time_s).collect();
        assert_eq!(times, vec![10.0, 10.5]);
    }

    #[test]
    fn test_load_skips_malformed_records() {
        let data = format!(
            "{}{}{}{}{}{}",
            HEADER,
            record(0),
            "1,2,3\n",
            "1,2,3,4,five,6,7,8,9,10\n",
            "1,2,3,4,NaN,6,7,8,9,10\n",
            record(1)
        );

        let mut store = TrajectoryStore::default();
        let summary = store.load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(summary.num_points, 2);
        assert_eq!(summary.num_malformed, 3);
        assert_eq!(store.points()[0].latitude, 0.0);
        assert_eq!(store.points()[1].latitude, 1.0);

        // Times follow the accepted records, not the file lines
        assert_relative_eq!(store.points()[1].time_s, DEFAULT_RECORD_PERIOD_S);
    }

    #[test]
    fn test_parse_record_errors() {
        let short = ByteRecord::from(vec!["1", "2", "3"]);
        assert_eq!(
            parse_record(&short, 0, 0.01),
            Err(RecordError::TooFewFields {
                expected: NUM_RECORD_FIELDS,
                found: 3
            })
        );

        let bad = ByteRecord::from(vec!["1", "2", "3", "x", "5", "6", "7", "8", "9", "10"]);
        assert_eq!(
            parse_record(&bad, 0, 0.01),
            Err(RecordError::NotNumeric {
                index: 3,
                name: "yaw",
                value: "x".into()
            })
        );
    }

    #[test]
    fn test_extra_columns_without_time() {
        // Trailing commas and unknown trailing columns do not reject the record
        let data = format!(
            "{}{}{}{}",
            HEADER,
            "0,0,0,0,0,0,0,0,0,0,\n",
            "1,0,0,0,0,0,0,0,0,0,\n",
            "2,0,0,0,0,0,0,0,0,0,lap_1,extra\n"
        );

        let mut store = TrajectoryStore::default();
        let summary = store.load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                num_points: 3,
                num_malformed: 0
            }
        );
        assert_eq!(store.points()[2].latitude, 2.0);
        assert_relative_eq!(store.points()[1].time_s, DEFAULT_RECORD_PERIOD_S);
        assert_relative_eq!(store.points()[2].time_s, 2.0 * DEFAULT_RECORD_PERIOD_S);
    }

    #[test]
    fn test_invalid_utf8_record_is_skipped() {
        let mut data = format!("{}{}", HEADER, record(0)).into_bytes();
        data.extend_from_slice(b"\xff\xfe,0,0,0,0,0,0,0,0,0\n");
        data.extend_from_slice(record(1).as_bytes());
        data.extend_from_slice(record(2).as_bytes());

        let mut store = TrajectoryStore::default();
        let summary = store.load_from_reader(&data[..]).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                num_points: 3,
                num_malformed: 1
            }
        );
        let lats: Vec<f64> = store.points().iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_decreasing_time_is_rejected() {
        let data = format!(
            "{}{}{}{}{}",
            HEADER,
            "0,0,0,0,0,0,0,0,0,0,5.0\n",
            "1,0,0,0,0,0,0,0,0,0,1.0\n",
            "2,0,0,0,0,0,0,0,0,0,5.0\n",
            "3,0,0,0,0,0,0,0,0,0,6.0\n"
        );

        let mut store = TrajectoryStore::default();
        let summary = store.load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(summary.num_points, 3);
        assert_eq!(summary.num_malformed, 1);

        let times: Vec<f64> = store.points().iter().map(|p| p.time_s).collect();
        assert_eq!(times, vec![5.0, 5.0, 6.0]);

        assert_eq!(
            check_time_order(store.points().last(), PathPoint::default()),
            Err(RecordError::TimeDecreasing {
                previous: 6.0,
                found: 0.0
            })
        );
    }

    #[test]
    fn test_blank_line_terminates() {
        let data = format!("{}{}{}\n{}", HEADER, record(0), record(1), record(2));

        let mut store = TrajectoryStore::default();
        let summary = store.load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(summary.num_points, 2);
        assert_eq!(store.points()[1].latitude, 1.0);
    }

    #[test]
    fn test_header_only_and_empty_sources() {
        let mut store = TrajectoryStore::default();

        store.load_from_reader(HEADER.as_bytes()).unwrap();
        assert!(store.is_empty());
        assert!(!store.is_usable());

        store.load_from_reader("".as_bytes()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reload_replaces_trajectory() {
        let mut store = TrajectoryStore::default();

        let first = format!("{}{}{}{}", HEADER, record(0), record(1), record(2));
        store.load_from_reader(first.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);

        let second = format!("{}{}", HEADER, record(7));
        store.load_from_reader(second.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.points()[0].latitude, 7.0);
        assert!(!store.is_usable());
    }

    #[test]
    fn test_unreadable_source_keeps_trajectory() {
        let mut store = TrajectoryStore::default();
        let data = format!("{}{}{}", HEADER, record(0), record(1));
        store.load_from_reader(data.as_bytes()).unwrap();

        match store.load("/this/trajectory/does/not/exist.csv") {
            Err(LoadError::Unreadable(_)) => (),
            r => panic!("Expected an unreadable error, got {:?}", r),
        }

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!(
            "replay_store_test_{}.csv",
            std::process::id()
        ));

        let mut data = String::from(HEADER);
        for i in 0..4 {
            data.push_str(&record(i));
        }
        std::fs::write(&path, data).unwrap();

        let mut store = TrajectoryStore::default();
        let summary = store.load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(summary.num_points, 4);
        assert_eq!(store.points()[3].longitude, 6.0);
    }
}
