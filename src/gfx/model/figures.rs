//! Built-in figures
//!
//! Each constructor wraps one procedural primitive in a single-unit [`Model`]
//! with the default material.

use crate::gfx::geometry::{self, GeometryData};
use crate::gfx::resources::material::Material;

use super::model::Model;
use super::model_unit::ModelUnit;

const ROUND_SEGMENTS: u32 = 32;

fn figure(name: &str, geometry: &GeometryData) -> Model {
    Model::from_unit(&ModelUnit::from_geometry(name, geometry, Material::default()))
}

impl Model {
    pub fn cube() -> Model {
        figure("Cube", &geometry::generate_cube())
    }

    pub fn sphere() -> Model {
        figure("Sphere", &geometry::generate_sphere(ROUND_SEGMENTS, ROUND_SEGMENTS / 2))
    }

    pub fn cone() -> Model {
        figure("Cone", &geometry::generate_cone(0.5, 1.0, ROUND_SEGMENTS))
    }

    pub fn cylinder() -> Model {
        figure("Cylinder", &geometry::generate_cylinder(0.5, 1.0, ROUND_SEGMENTS))
    }

    pub fn torus() -> Model {
        figure(
            "Torus",
            &geometry::generate_torus(0.5, 0.2, ROUND_SEGMENTS, ROUND_SEGMENTS / 2),
        )
    }

    pub fn tetrahedron() -> Model {
        figure("Tetrahedron", &geometry::generate_tetrahedron())
    }

    pub fn octahedron() -> Model {
        figure("Octahedron", &geometry::generate_octahedron())
    }

    pub fn icosahedron() -> Model {
        figure("Icosahedron", &geometry::generate_icosahedron())
    }

    /// Unit square in the XZ plane
    pub fn square() -> Model {
        figure("Square", &geometry::generate_plane(1.0, 1.0, 1, 1))
    }

    pub fn triangle() -> Model {
        figure("Triangle", &geometry::generate_triangle())
    }

    pub fn circle() -> Model {
        figure("Circle", &geometry::generate_circle(0.5, ROUND_SEGMENTS))
    }

    /// Box-and-lens figure drawn at other cameras' positions
    pub fn camera_figure() -> Model {
        figure("Camera", &geometry::generate_camera_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_figure_has_one_unit_with_geometry() {
        let figures = [
            Model::cube(),
            Model::sphere(),
            Model::cone(),
            Model::cylinder(),
            Model::torus(),
            Model::tetrahedron(),
            Model::octahedron(),
            Model::icosahedron(),
            Model::square(),
            Model::triangle(),
            Model::circle(),
            Model::camera_figure(),
        ];

        for model in &figures {
            assert_eq!(model.len(), 1);
            let unit = &model.units()[0];
            assert!(unit.mesh().index_count() >= 3, "{} has no triangles", unit.name);
            assert_eq!(unit.material, Material::default());
        }
        assert_eq!(figures[0].units()[0].name, "Cube");
        assert_eq!(figures[11].units()[0].name, "Camera");
    }
}
