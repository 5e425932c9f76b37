use crate::gfx::model::{ComplexModel, ModelUnit};
use crate::wgpu_utils::IndexBuffer;

/// Model bind group slot; slot 0 holds the program's frame uniforms
pub const MODEL_BIND_GROUP: u32 = 1;

pub trait DrawModel<'a> {
    fn draw_unit(&mut self, unit: &'a ModelUnit);
    fn draw_complex_model(&mut self, model: &'a ComplexModel);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_unit(&mut self, unit: &'b ModelUnit) {
        // Skip units whose GPU resources aren't initialised yet
        let (Some(bind_group), Some(mesh)) = (unit.bind_group(), unit.mesh().gpu()) else {
            return;
        };
        if mesh.index_buffer.is_empty() {
            return;
        }

        self.set_bind_group(MODEL_BIND_GROUP, bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice());
        self.set_index_buffer(mesh.index_buffer.slice(), IndexBuffer::FORMAT);
        self.draw_indexed(0..mesh.index_buffer.len(), 0, 0..1);
    }

    fn draw_complex_model(&mut self, model: &'b ComplexModel) {
        for unit in model.units() {
            self.draw_unit(unit);
        }
    }
}
