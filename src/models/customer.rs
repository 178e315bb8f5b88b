//! Customer and time window types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::VehicleType;

/// A time window constraint for service at a customer location.
///
/// The vehicle must arrive no later than `latest` and may arrive as early as
/// `earliest` (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use u_vrp::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.earliest() <= tw.latest());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    earliest: f64,
    latest: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `earliest > latest` or either value is non-finite.
    pub fn new(earliest: f64, latest: f64) -> Option<Self> {
        if !earliest.is_finite() || !latest.is_finite() || earliest > latest {
            return None;
        }
        Some(Self { earliest, latest })
    }

    /// Earliest allowable service start.
    pub fn earliest(&self) -> f64 {
        self.earliest
    }

    /// Latest allowable arrival time.
    pub fn latest(&self) -> f64 {
        self.latest
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.earliest && time <= self.latest
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the vehicle arrives within or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        (self.earliest - arrival).max(0.0)
    }

    /// Returns `true` if arriving at the given time is too late.
    pub fn is_late(&self, arrival: f64) -> bool {
        arrival > self.latest
    }
}

/// A customer (or the depot) in a routing problem.
///
/// Customers have a location, a demand, and optionally a time window,
/// a service duration, a collection-point tag and the set of vehicle types
/// allowed to serve them.
///
/// # Examples
///
/// ```
/// use u_vrp::models::Customer;
///
/// let depot = Customer::depot(35.0, 35.0);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let c = Customer::new(1, 41.0, 49.0, 10).with_service_time(10.0);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.service_time(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    x: f64,
    y: f64,
    demand: i32,
    #[serde(default)]
    service_time: f64,
    #[serde(default)]
    time_window: Option<TimeWindow>,
    #[serde(default)]
    collection_point: Option<usize>,
    #[serde(default)]
    allowed_vehicle_types: Option<BTreeSet<VehicleType>>,
}

impl Customer {
    /// Creates a new customer with no time window and zero service time.
    pub fn new(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_time: 0.0,
            time_window: None,
            collection_point: None,
            allowed_vehicle_types: None,
        }
    }

    /// Creates a depot at the given coordinates (id=0, demand=0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0)
    }

    /// Sets a time window for this customer.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Sets the service duration spent at this customer.
    pub fn with_service_time(mut self, service_time: f64) -> Self {
        self.service_time = service_time;
        self
    }

    /// Tags this customer with a collection point.
    pub fn with_collection_point(mut self, point: usize) -> Self {
        self.collection_point = Some(point);
        self
    }

    /// Restricts which vehicle types may serve this customer.
    pub fn with_allowed_vehicle_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = VehicleType>,
    {
        self.allowed_vehicle_types = Some(types.into_iter().collect());
        self
    }

    /// Node id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand at this customer.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Service duration at this customer.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Time window constraint, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Collection point tag, if any.
    pub fn collection_point(&self) -> Option<usize> {
        self.collection_point
    }

    /// Vehicle types allowed to serve this customer. `None` means any.
    pub fn allowed_vehicle_types(&self) -> Option<&BTreeSet<VehicleType>> {
        self.allowed_vehicle_types.as_ref()
    }

    /// Euclidean distance to another customer.
    pub fn distance_to(&self, other: &Customer) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
