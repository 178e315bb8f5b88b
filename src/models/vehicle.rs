//! Vehicles and fleet description.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size class of a vehicle in a heterogeneous fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Small van.
    Small,
    /// Medium truck.
    Medium,
    /// Large truck.
    Large,
}

impl VehicleType {
    /// Fixed cost charged for putting one vehicle of this type on the road.
    pub fn usage_cost(self) -> f64 {
        match self {
            VehicleType::Small => 100.0,
            VehicleType::Medium => 150.0,
            VehicleType::Large => 200.0,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleType::Small => "small",
            VehicleType::Medium => "medium",
            VehicleType::Large => "large",
        };
        f.write_str(name)
    }
}

/// A vehicle that services one route.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Vehicle, VehicleType};
///
/// let v = Vehicle::new(0, 200).with_type(VehicleType::Large);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 200);
/// assert_eq!(v.vehicle_type(), Some(VehicleType::Large));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
    #[serde(default)]
    vehicle_type: Option<VehicleType>,
}

impl Vehicle {
    /// Creates an untyped vehicle with the given ID and capacity.
    pub fn new(id: usize, capacity: i32) -> Self {
        Self {
            id,
            capacity,
            vehicle_type: None,
        }
    }

    /// Sets the vehicle type.
    pub fn with_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Vehicle type, if the fleet is typed.
    pub fn vehicle_type(&self) -> Option<VehicleType> {
        self.vehicle_type
    }
}

/// The vehicles available to an instance.
///
/// Route `i` of a solution is driven by vehicle `i`. Routes beyond the
/// fleet size (created by the greedy fallback) use the uniform capacity.
///
/// # Examples
///
/// ```
/// use u_vrp::models::Fleet;
///
/// let fleet = Fleet::homogeneous(3, 100);
/// assert_eq!(fleet.vehicle_count(), 3);
/// assert_eq!(fleet.capacity_of(1), 100);
/// assert_eq!(fleet.capacity_of(7), 100);
///
/// let mixed = Fleet::from_capacities(vec![50, 80]);
/// assert_eq!(mixed.capacity_of(1), 80);
/// assert_eq!(mixed.uniform_capacity(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    capacity: i32,
}

impl Fleet {
    /// A fleet of `count` identical vehicles.
    pub fn homogeneous(count: usize, capacity: i32) -> Self {
        Self {
            vehicles: (0..count).map(|i| Vehicle::new(i, capacity)).collect(),
            capacity,
        }
    }

    /// One untyped vehicle per listed capacity.
    ///
    /// The uniform capacity is the smallest listed capacity.
    pub fn from_capacities(capacities: Vec<i32>) -> Self {
        let vehicles = capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| Vehicle::new(i, c))
            .collect();
        Self::from_vehicles(vehicles)
    }

    /// A fleet built from explicit vehicles.
    ///
    /// The uniform capacity is the smallest vehicle capacity (0 if empty).
    pub fn from_vehicles(vehicles: Vec<Vehicle>) -> Self {
        let capacity = vehicles.iter().map(Vehicle::capacity).min().unwrap_or(0);
        Self { vehicles, capacity }
    }

    /// Overrides the uniform capacity.
    pub fn with_uniform_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Assigns a type to the vehicle at `index`. Out-of-range indices are ignored.
    pub fn with_vehicle_type(mut self, index: usize, vehicle_type: VehicleType) -> Self {
        if let Some(v) = self.vehicles.get_mut(index) {
            v.vehicle_type = Some(vehicle_type);
        }
        self
    }

    /// All vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Vehicle driving route `index`, if the fleet has one.
    pub fn vehicle(&self, index: usize) -> Option<&Vehicle> {
        self.vehicles.get(index)
    }

    /// Number of vehicles.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Capacity used when a route has no dedicated vehicle, and by
    /// heuristics that assume a homogeneous fleet.
    pub fn uniform_capacity(&self) -> i32 {
        self.capacity
    }

    /// Capacity of the vehicle driving route `index`, falling back to the
    /// uniform capacity.
    pub fn capacity_of(&self, index: usize) -> i32 {
        self.vehicles
            .get(index)
            .map_or(self.capacity, Vehicle::capacity)
    }

    /// Type of the vehicle driving route `index`.
    pub fn type_of(&self, index: usize) -> Option<VehicleType> {
        self.vehicles.get(index).and_then(Vehicle::vehicle_type)
    }

    /// Returns `true` if vehicles do not all share one capacity.
    pub fn is_heterogeneous(&self) -> bool {
        self.vehicles
            .windows(2)
            .any(|w| w[0].capacity() != w[1].capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new(1, 100).with_type(VehicleType::Small);
        assert_eq!(v.id(), 1);
        assert_eq!(v.capacity(), 100);
        assert_eq!(v.vehicle_type(), Some(VehicleType::Small));
    }

    #[test]
    fn test_usage_cost() {
        assert_eq!(VehicleType::Small.usage_cost(), 100.0);
        assert_eq!(VehicleType::Medium.usage_cost(), 150.0);
        assert_eq!(VehicleType::Large.usage_cost(), 200.0);
    }

    #[test]
    fn test_fleet_types() {
        let fleet = Fleet::homogeneous(2, 40).with_vehicle_type(1, VehicleType::Large);
        assert_eq!(fleet.type_of(0), None);
        assert_eq!(fleet.type_of(1), Some(VehicleType::Large));
        assert_eq!(fleet.type_of(5), None);
        assert!(!fleet.is_heterogeneous());
    }

    #[test]
    fn test_fleet_heterogeneous() {
        let fleet = Fleet::from_capacities(vec![30, 60, 30]);
        assert!(fleet.is_heterogeneous());
        assert_eq!(fleet.uniform_capacity(), 30);
        assert_eq!(fleet.capacity_of(1), 60);
        let fleet = fleet.with_uniform_capacity(45);
        assert_eq!(fleet.capacity_of(3), 45);
    }

    #[test]
    fn test_fleet_empty() {
        let fleet = Fleet::from_vehicles(vec![]);
        assert_eq!(fleet.vehicle_count(), 0);
        assert_eq!(fleet.uniform_capacity(), 0);
    }
}
