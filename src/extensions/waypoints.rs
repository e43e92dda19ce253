//! Group steering
//!
//! Every thousand ticks (phase-shifted per kind) the entities of a kind are
//! clustered and each cluster gets a common destination near its centre,
//! jittered per member so groups spread out on arrival.

use glam::{DVec2, IVec2};

use super::{Extension, ExtensionContext};
use crate::entity::EntityKind;

const PERIOD: u64 = 1000;
/// Chance of splitting into one more group than usual
const SPLIT_CHANCE: f64 = 0.2;
const MAX_KMEANS_ROUNDS: usize = 64;

struct WaypointProfile {
    kind: EntityKind,
    phase: u64,
    max_horizontal: i32,
    max_vertical: i32,
    max_variance: i32,
}

const PROFILES: [WaypointProfile; 3] = [
    WaypointProfile {
        kind: EntityKind::Fish,
        phase: 700,
        max_horizontal: 20,
        max_vertical: 5,
        max_variance: 2,
    },
    WaypointProfile {
        kind: EntityKind::Butterfly,
        phase: 800,
        max_horizontal: 20,
        max_vertical: 5,
        max_variance: 4,
    },
    WaypointProfile {
        kind: EntityKind::Bird,
        phase: 900,
        max_horizontal: 100,
        max_vertical: 50,
        max_variance: 8,
    },
];

/// Assigns shared waypoints to clusters of same-kind entities
#[derive(Debug, Default)]
pub struct GenWaypoints;

impl Extension for GenWaypoints {
    fn name(&self) -> &'static str {
        "gen-waypoints"
    }

    fn run(&mut self, ctx: &mut ExtensionContext) {
        for profile in &PROFILES {
            if (ctx.iteration + profile.phase) % PERIOD == 0 {
                generate(ctx, profile);
            }
        }
    }
}

fn generate(ctx: &mut ExtensionContext, profile: &WaypointProfile) {
    let members: Vec<usize> = ctx
        .entities
        .entities()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_active() && e.kind() == profile.kind)
        .map(|(index, _)| index)
        .collect();
    if members.is_empty() {
        return;
    }
    let positions: Vec<IVec2> = members
        .iter()
        .map(|&index| {
            let entity = &ctx.entities.entities()[index];
            IVec2::new(entity.x(), entity.y())
        })
        .collect();

    let groups = if positions.len() == 1 {
        vec![(positions[0], vec![0])]
    } else {
        let mut k = if positions.len() == 2 { 1 } else { 2 };
        if ctx.random.next_float() < SPLIT_CHANCE {
            k += 1;
        }
        k_means(&positions, k)
    };

    let size = IVec2::new(ctx.area.width(), ctx.area.height());
    for (centre, group) in groups {
        let wx = centre.x + jitter(ctx, profile.max_horizontal);
        let wy = centre.y + jitter(ctx, profile.max_vertical);
        let target = IVec2::new(reflect(wx, size.x), reflect(wy, size.y));

        for member in group {
            let wyy = target.y + jitter(ctx, profile.max_variance);
            let wxx = target.x + jitter(ctx, profile.max_variance);
            ctx.entities.entities_mut()[members[member]].assign_waypoint(wxx, wyy);
        }
        log::debug!("{} group heading to ({}, {})", profile.kind, target.x, target.y);
    }
}

/// Uniform in `-max..max`
fn jitter(ctx: &mut ExtensionContext, max: i32) -> i32 {
    ctx.random.next_int((2 * max) as u32) as i32 - max
}

/// Fold a coordinate back into `0..limit` by mirroring at both edges
fn reflect(value: i32, limit: i32) -> i32 {
    let value = value.abs();
    if value >= limit { limit - (value - limit) } else { value }
}

/// Cluster `points` into `k` groups seeded with the first `k` points.
///
/// Returns the rounded centroid and member indices of every non-empty group.
fn k_means(points: &[IVec2], k: usize) -> Vec<(IVec2, Vec<usize>)> {
    let k = k.min(points.len());
    let mut centroids: Vec<IVec2> = points[..k].to_vec();
    let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); k];

    for _ in 0..MAX_KMEANS_ROUNDS {
        clusters.iter_mut().for_each(Vec::clear);
        for (index, point) in points.iter().enumerate() {
            let mut nearest = 0;
            let mut best = i32::MAX;
            for (c, centroid) in centroids.iter().enumerate() {
                let distance = (*point - *centroid).length_squared();
                if distance < best {
                    best = distance;
                    nearest = c;
                }
            }
            clusters[nearest].push(index);
        }

        let next: Vec<IVec2> = clusters
            .iter()
            .zip(&centroids)
            .map(|(members, &old)| {
                if members.is_empty() {
                    return old;
                }
                let sum = members.iter().fold(DVec2::ZERO, |acc, &i| acc + points[i].as_dvec2());
                // half-way values round up
                (sum / members.len() as f64 + DVec2::splat(0.5)).floor().as_ivec2()
            })
            .collect();

        if next == centroids {
            break;
        }
        centroids = next;
    }

    centroids
        .into_iter()
        .zip(clusters)
        .filter(|(_, members)| !members.is_empty())
        .collect()
}
