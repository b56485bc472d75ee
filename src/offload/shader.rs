//! WGSL kernel evaluated once per cell.

pub const ENTRY_POINT: &str = "generation";
pub const WORKGROUP_SIZE: u32 = 256;

/// Reads `current`, writes `next`. Same border offsets as
/// `Grid::neighbor_offsets` and the same B3/S23 rule as the host engines.
pub const LIFE_SHADER: &str = r#"
struct Params {
    width: u32,
    height: u32,
    total: u32,
    row_pitch: u32,
}

@group(0) @binding(0) var<storage, read> current: array<u32>;
@group(0) @binding(1) var<storage, read_write> next: array<u32>;
@group(0) @binding(2) var<uniform> params: Params;

@compute @workgroup_size(256)
fn generation(@builtin(global_invocation_id) gid: vec3<u32>) {
    let idx = gid.y * params.row_pitch + gid.x;
    if (idx >= params.total) {
        return;
    }

    let x = idx % params.width;
    let y = idx / params.width;
    let w = i32(params.width);
    let right_border = i32(params.width - 1u);
    let bottom_border = i32(params.total - params.width);

    let left = select(-1, right_border, x == 0u);
    let right = select(1, -right_border, x == params.width - 1u);
    let top = select(-w, bottom_border, y == 0u);
    let bot = select(w, -bottom_border, y == params.height - 1u);

    let i = i32(idx);
    let n = current[u32(i + top + left)]
        + current[u32(i + top)]
        + current[u32(i + top + right)]
        + current[u32(i + left)]
        + current[u32(i + right)]
        + current[u32(i + bot + left)]
        + current[u32(i + bot)]
        + current[u32(i + bot + right)];

    let alive = current[idx] == 1u;
    next[idx] = select(0u, 1u, n == 3u || (alive && n == 2u));
}
"#;

#[cfg(test)]
mod tests {
    use super::{ENTRY_POINT, LIFE_SHADER, WORKGROUP_SIZE};

    #[test]
    fn shader_declares_entry_point_and_workgroup_size() {
        assert!(LIFE_SHADER.contains(&format!("fn {ENTRY_POINT}(")));
        assert!(LIFE_SHADER.contains(&format!("@workgroup_size({WORKGROUP_SIZE})")));
    }
}
