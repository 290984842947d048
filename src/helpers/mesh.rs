use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::Mesh;
use drape::GridTopology;

/// Unit plane subdivided into `columns` x `rows` cells, facing +Z.
/// Vertex order matches the cloth nodes so positions can be swapped in each frame.
pub fn grid_plane_mesh(columns: usize, rows: usize) -> Mesh {
    let topology = GridTopology::new(columns, rows);
    let positions: Vec<[f32; 3]> = topology
        .unit_plane_positions()
        .iter()
        .map(|p| p.to_array())
        .collect();
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, topology.uvs());
    mesh.insert_indices(Indices::U32(topology.triangle_indices()));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::mesh::VertexAttributeValues;

    #[test]
    fn test_grid_plane_mesh_counts() {
        let mesh = grid_plane_mesh(8, 8);
        assert_eq!(mesh.count_vertices(), 81);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices.len(), 8 * 8 * 6),
            other => panic!("unexpected indices {other:?}"),
        }
    }

    #[test]
    fn test_grid_plane_mesh_spans_unit_square() {
        let mesh = grid_plane_mesh(4, 2);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        assert_eq!(positions[0], [-0.5, 0.5, 0.0]);
        assert_eq!(positions[positions.len() - 1], [0.5, -0.5, 0.0]);
    }
}
