//! Map presentation: markers, clustering and popups.
//!
//! The presenter computes everything from the record list and drives a
//! [`MapSurface`], the seam behind which the actual tile/marker renderer
//! lives. Re-filtering rebuilds the whole scene; nothing is diffed.

use std::f64::consts::PI;

use serde::Serialize;

use monastery_core::{Coordinates, District, Monastery, Sect};

/// Pixel radius within which markers collapse into a cluster.
pub const CLUSTER_RADIUS_PX: f64 = 50.0;

/// Zoom level used when a single monastery is focused.
pub const FOCUS_ZOOM: u8 = 15;

/// Initial zoom over the whole region.
pub const DEFAULT_ZOOM: u8 = 9;

/// Popup descriptions are cut to this many characters.
pub const POPUP_DESCRIPTION_LIMIT: usize = 100;

/// Marker palette keyed by sect.
pub fn sect_color(sect: Sect) -> &'static str {
    match sect {
        Sect::Nyingma => "#8B4513",
        Sect::Kagyu => "#D2691E",
        Sect::Sakya => "#CD853F",
        Sect::Gelug => "#A0522D",
        Sect::Bon => "#D2B48C",
    }
}

/// One marker per monastery.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub monastery_id: u32,
    pub coordinates: Coordinates,
    pub color: &'static str,
    /// First letter of the sect name, shown on the marker badge.
    pub label: char,
}

impl Marker {
    pub fn for_monastery(monastery: &Monastery) -> Self {
        Self {
            monastery_id: monastery.id,
            coordinates: monastery.coordinates,
            color: sect_color(monastery.sect),
            label: monastery.sect.name().chars().next().unwrap_or('?'),
        }
    }
}

/// Cluster badge size tier, chosen by member count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

impl ClusterSize {
    pub fn for_count(count: usize) -> Self {
        if count > 10 {
            ClusterSize::Large
        } else if count > 5 {
            ClusterSize::Medium
        } else {
            ClusterSize::Small
        }
    }
}

/// A group of nearby markers rendered as one badge with a count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    pub anchor: Coordinates,
    pub size: ClusterSize,
    pub member_ids: Vec<u32>,
}

impl Cluster {
    pub fn count(&self) -> usize {
        self.member_ids.len()
    }
}

/// Info popup contents for a focused monastery.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Popup {
    pub name: String,
    pub sect: Sect,
    pub summary: String,
    pub district: District,
    pub established: String,
}

impl Popup {
    pub fn for_monastery(monastery: &Monastery) -> Self {
        let summary = if monastery.description.chars().count() > POPUP_DESCRIPTION_LIMIT {
            let cut: String = monastery
                .description
                .chars()
                .take(POPUP_DESCRIPTION_LIMIT)
                .collect();
            format!("{cut}...")
        } else {
            monastery.description.clone()
        };
        Self {
            name: monastery.name.clone(),
            sect: monastery.sect,
            summary,
            district: monastery.district,
            established: monastery.established.clone(),
        }
    }
}

/// Viewport: center plus zoom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

/// The rendering seam. A browser build backs this with the tile map
/// widget; tests use [`RecordingSurface`].
pub trait MapSurface {
    fn clear(&mut self);
    fn add_marker(&mut self, marker: &Marker);
    fn add_cluster(&mut self, cluster: &Cluster);
    fn set_view(&mut self, view: MapView);
    fn open_popup(&mut self, popup: &Popup);
}

/// Web-Mercator pixel position at a given zoom.
fn pixel_position(coordinates: Coordinates, zoom: u8) -> (f64, f64) {
    let scale = 256.0 * f64::powi(2.0, zoom as i32);
    let x = (coordinates.longitude + 180.0) / 360.0 * scale;
    let lat = coordinates.latitude.to_radians();
    let y = (1.0 - ((lat.tan() + 1.0 / lat.cos()).ln()) / PI) / 2.0 * scale;
    (x, y)
}

/// Projects monastery records onto markers and clusters and drives a
/// [`MapSurface`].
#[derive(Debug)]
pub struct MapPresenter {
    zoom: u8,
    markers: Vec<Marker>,
    clusters: Vec<Cluster>,
}

impl Default for MapPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl MapPresenter {
    pub fn new() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            clusters: Vec::new(),
        }
    }

    pub fn with_zoom(zoom: u8) -> Self {
        Self {
            zoom,
            ..Self::new()
        }
    }

    /// Markers currently on the scene, one per record of the last rebuild.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Drop the whole scene and rebuild it from the given records.
    pub fn rebuild(&mut self, records: &[&Monastery], surface: &mut dyn MapSurface) {
        surface.clear();
        self.markers = records.iter().map(|m| Marker::for_monastery(m)).collect();
        self.clusters = cluster_markers(&self.markers, self.zoom);

        for cluster in &self.clusters {
            if cluster.count() == 1 {
                let id = cluster.member_ids[0];
                if let Some(marker) = self.markers.iter().find(|m| m.monastery_id == id) {
                    surface.add_marker(marker);
                }
            } else {
                surface.add_cluster(cluster);
            }
        }

        tracing::debug!(
            markers = self.markers.len(),
            clusters = self.clusters.len(),
            "map scene rebuilt"
        );
    }

    /// Center the view on a monastery and open its popup.
    pub fn select(&self, monastery: &Monastery, surface: &mut dyn MapSurface) {
        surface.set_view(MapView {
            center: monastery.coordinates,
            zoom: FOCUS_ZOOM,
        });
        surface.open_popup(&Popup::for_monastery(monastery));
    }
}

/// Greedy grouping: each marker joins the first cluster whose anchor lies
/// within [`CLUSTER_RADIUS_PX`] at the current zoom, otherwise starts a new
/// one. The cluster anchor shown on screen is the member centroid.
fn cluster_markers(markers: &[Marker], zoom: u8) -> Vec<Cluster> {
    struct Group {
        anchor_px: (f64, f64),
        members: Vec<usize>,
    }

    let mut groups: Vec<Group> = Vec::new();
    for (index, marker) in markers.iter().enumerate() {
        let px = pixel_position(marker.coordinates, zoom);
        let joined = groups.iter_mut().find(|g| {
            let dx = g.anchor_px.0 - px.0;
            let dy = g.anchor_px.1 - px.1;
            (dx * dx + dy * dy).sqrt() <= CLUSTER_RADIUS_PX
        });
        match joined {
            Some(group) => group.members.push(index),
            None => groups.push(Group {
                anchor_px: px,
                members: vec![index],
            }),
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let count = group.members.len() as f64;
            let (lat_sum, lon_sum) = group.members.iter().fold((0.0, 0.0), |acc, &i| {
                (
                    acc.0 + markers[i].coordinates.latitude,
                    acc.1 + markers[i].coordinates.longitude,
                )
            });
            Cluster {
                anchor: Coordinates::new(lat_sum / count, lon_sum / count),
                size: ClusterSize::for_count(group.members.len()),
                member_ids: group
                    .members
                    .iter()
                    .map(|&i| markers[i].monastery_id)
                    .collect(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Recording surface
// ---------------------------------------------------------------------------

/// What a [`RecordingSurface`] saw, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    Cleared,
    MarkerAdded(u32),
    ClusterAdded(Vec<u32>),
    ViewSet(MapView),
    PopupOpened(String),
}

/// Surface double that records calls instead of rendering. Used by the
/// tests and by any headless embedding.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    live: Vec<u32>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every monastery currently represented on the surface, whether
    /// as a lone marker or inside a cluster.
    pub fn live_record_ids(&self) -> &[u32] {
        &self.live
    }

    pub fn last_view(&self) -> Option<MapView> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::ViewSet(view) => Some(*view),
            _ => None,
        })
    }

    pub fn last_popup(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::PopupOpened(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl MapSurface for RecordingSurface {
    fn clear(&mut self) {
        self.live.clear();
        self.events.push(SurfaceEvent::Cleared);
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.live.push(marker.monastery_id);
        self.events.push(SurfaceEvent::MarkerAdded(marker.monastery_id));
    }

    fn add_cluster(&mut self, cluster: &Cluster) {
        self.live.extend(&cluster.member_ids);
        self.events
            .push(SurfaceEvent::ClusterAdded(cluster.member_ids.clone()));
    }

    fn set_view(&mut self, view: MapView) {
        self.events.push(SurfaceEvent::ViewSet(view));
    }

    fn open_popup(&mut self, popup: &Popup) {
        self.events.push(SurfaceEvent::PopupOpened(popup.name.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monastery_core::curated;

    fn refs(records: &[Monastery]) -> Vec<&Monastery> {
        records.iter().collect()
    }

    #[test]
    fn test_marker_carries_sect_color_and_label() {
        let records = curated().unwrap();
        let rumtek = &records[0];
        let marker = Marker::for_monastery(rumtek);
        assert_eq!(marker.color, "#D2691E");
        assert_eq!(marker.label, 'K');
    }

    #[test]
    fn test_cluster_size_tiers() {
        assert_eq!(ClusterSize::for_count(1), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(5), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(6), ClusterSize::Medium);
        assert_eq!(ClusterSize::for_count(10), ClusterSize::Medium);
        assert_eq!(ClusterSize::for_count(11), ClusterSize::Large);
    }

    #[test]
    fn test_marker_count_matches_record_count() {
        let records = curated().unwrap();
        let mut presenter = MapPresenter::new();
        let mut surface = RecordingSurface::new();

        presenter.rebuild(&refs(&records), &mut surface);
        assert_eq!(presenter.marker_count(), records.len());
        assert_eq!(surface.live_record_ids().len(), records.len());
    }

    #[test]
    fn test_rebuild_leaves_no_orphans() {
        let records = curated().unwrap();
        let mut presenter = MapPresenter::new();
        let mut surface = RecordingSurface::new();

        presenter.rebuild(&refs(&records), &mut surface);
        let subset: Vec<&Monastery> = records.iter().take(3).collect();
        presenter.rebuild(&subset, &mut surface);

        assert_eq!(presenter.marker_count(), 3);
        let mut live = surface.live_record_ids().to_vec();
        live.sort_unstable();
        assert_eq!(live, vec![1, 2, 3]);
    }

    #[test]
    fn test_nearby_markers_cluster_at_low_zoom() {
        let records = curated().unwrap();
        // Tashiding (id 3), Dubdi (id 8) and Khecheopalri (id 14) share the
        // same coordinates in the seed data.
        let mut presenter = MapPresenter::with_zoom(DEFAULT_ZOOM);
        let mut surface = RecordingSurface::new();
        presenter.rebuild(&refs(&records), &mut surface);

        let cluster = presenter
            .clusters()
            .iter()
            .find(|c| c.member_ids.contains(&3))
            .unwrap();
        assert!(cluster.member_ids.contains(&8));
        assert!(cluster.member_ids.contains(&14));
        assert!(cluster.count() >= 3);
    }

    #[test]
    fn test_high_zoom_splits_distant_markers() {
        let records = curated().unwrap();
        let mut presenter = MapPresenter::with_zoom(18);
        let mut surface = RecordingSurface::new();
        presenter.rebuild(&refs(&records), &mut surface);

        // Rumtek and Pemayangtse sit on opposite sides of the state; at
        // street zoom they can never share a cluster.
        let rumtek = presenter
            .clusters()
            .iter()
            .find(|c| c.member_ids.contains(&1))
            .unwrap();
        assert!(!rumtek.member_ids.contains(&2));
    }

    #[test]
    fn test_select_centers_and_opens_popup() {
        let records = curated().unwrap();
        let presenter = MapPresenter::new();
        let mut surface = RecordingSurface::new();

        presenter.select(&records[1], &mut surface);

        let view = surface.last_view().unwrap();
        assert_eq!(view.zoom, FOCUS_ZOOM);
        assert_eq!(view.center, records[1].coordinates);
        assert_eq!(surface.last_popup(), Some("Pemayangtse Monastery"));
    }

    #[test]
    fn test_popup_truncates_long_descriptions() {
        let records = curated().unwrap();
        let popup = Popup::for_monastery(&records[0]);
        assert!(popup.summary.ends_with("..."));
        assert_eq!(
            popup.summary.chars().count(),
            POPUP_DESCRIPTION_LIMIT + 3
        );
    }
}
