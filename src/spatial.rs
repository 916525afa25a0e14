//! Nearest-point queries over labeled 2D point sets.
//!
//! A uniform bucket grid sized to the point density. Built per point set as
//! needed: the polygon mesh keeps one over all cell centers, and migration
//! stages build land-only subsets on top of the same structure.

/// A labeled point set answering nearest-point and radius queries.
///
/// Queries are deterministic: ties resolve to the first point in build
/// order.
#[derive(Clone, Debug, Default)]
pub struct SpatialIndex {
    min_x: f32,
    min_y: f32,
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// Point indices per bucket, row-major.
    buckets: Vec<Vec<u32>>,
    /// (x, y, label) in build order.
    points: Vec<(f32, f32, u32)>,
}

impl SpatialIndex {
    /// Build an index from `(x, y, label)` triples.
    pub fn build(points: impl IntoIterator<Item = (f32, f32, u32)>) -> Self {
        let points: Vec<(f32, f32, u32)> = points.into_iter().collect();
        if points.is_empty() {
            return Self::default();
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for &(x, y, _) in &points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let width = (max_x - min_x).max(1e-3);
        let height = (max_y - min_y).max(1e-3);
        // Aim for roughly one point per bucket.
        let target = (points.len() as f32).sqrt().ceil().max(1.0);
        let cell_size = (width.max(height) / target).max(1e-3);
        let cols = (width / cell_size).ceil() as usize + 1;
        let rows = (height / cell_size).ceil() as usize + 1;

        let mut buckets = vec![Vec::new(); cols * rows];
        for (i, &(x, y, _)) in points.iter().enumerate() {
            let col = (((x - min_x) / cell_size) as usize).min(cols - 1);
            let row = (((y - min_y) / cell_size) as usize).min(rows - 1);
            buckets[row * cols + col].push(i as u32);
        }

        Self {
            min_x,
            min_y,
            cell_size,
            cols,
            rows,
            buckets,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    fn bucket_of(&self, x: f32, y: f32) -> (i64, i64) {
        let col = ((x - self.min_x) / self.cell_size).floor() as i64;
        let row = ((y - self.min_y) / self.cell_size).floor() as i64;
        (col, row)
    }

    /// Label of the nearest point to `(x, y)`, or `None` if the index is
    /// empty. Searches buckets in expanding square rings and stops once the
    /// ring lower bound exceeds the best distance found.
    pub fn nearest(&self, x: f32, y: f32) -> Option<u32> {
        if self.points.is_empty() {
            return None;
        }

        let (qc, qr) = self.bucket_of(x, y);
        let mut best_d2 = f32::MAX;
        let mut best: Option<u32> = None;

        // Far enough to reach every bucket even when the query point lies
        // outside the indexed bounding box.
        let far_col = qc.abs().max((self.cols as i64 - 1 - qc).abs());
        let far_row = qr.abs().max((self.rows as i64 - 1 - qr).abs());
        let max_ring = far_col.max(far_row);
        for ring in 0..=max_ring {
            // Any point in a bucket at ring r is at least (r-1) buckets away.
            let lower = (ring - 1).max(0) as f32 * self.cell_size;
            if best.is_some() && lower * lower > best_d2 {
                break;
            }

            for (col, row) in ring_buckets(qc, qr, ring) {
                if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
                    continue;
                }
                let bucket = &self.buckets[row as usize * self.cols + col as usize];
                for &pi in bucket {
                    let (px, py, label) = self.points[pi as usize];
                    let d2 = (px - x) * (px - x) + (py - y) * (py - y);
                    if d2 < best_d2 {
                        best_d2 = d2;
                        best = Some(label);
                    }
                }
            }
        }

        best
    }

    /// Labels of all points within `radius` of `(x, y)`, sorted ascending.
    pub fn within_radius(&self, x: f32, y: f32, radius: f32) -> Vec<u32> {
        if self.points.is_empty() || radius < 0.0 {
            return Vec::new();
        }

        let (min_col, min_row) = self.bucket_of(x - radius, y - radius);
        let (max_col, max_row) = self.bucket_of(x + radius, y + radius);
        let r2 = radius * radius;

        let mut hits: Vec<u32> = Vec::new();
        for row in min_row.max(0)..=max_row.min(self.rows as i64 - 1) {
            for col in min_col.max(0)..=max_col.min(self.cols as i64 - 1) {
                let bucket = &self.buckets[row as usize * self.cols + col as usize];
                for &pi in bucket {
                    let (px, py, label) = self.points[pi as usize];
                    let d2 = (px - x) * (px - x) + (py - y) * (py - y);
                    if d2 <= r2 {
                        hits.push(label);
                    }
                }
            }
        }
        hits.sort_unstable();
        hits
    }
}

/// Buckets on the square ring at Chebyshev distance `ring` around a center
/// bucket. Ring 0 is the center bucket itself.
fn ring_buckets(qc: i64, qr: i64, ring: i64) -> Vec<(i64, i64)> {
    if ring == 0 {
        return vec![(qc, qr)];
    }
    let mut out = Vec::with_capacity((ring as usize) * 8);
    for col in (qc - ring)..=(qc + ring) {
        out.push((col, qr - ring));
        out.push((col, qr + ring));
    }
    for row in (qr - ring + 1)..(qr + ring) {
        out.push((qc - ring, row));
        out.push((qc + ring, row));
    }
    out
}
