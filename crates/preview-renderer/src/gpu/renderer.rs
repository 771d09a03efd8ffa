//! Scene renderer: draws the scene's textured meshes with a depth buffer.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use uuid::Uuid;
use wgpu::util::DeviceExt;

use super::resources::{
    create_depth_texture, create_material_sampler, create_material_texture, depth_stencil_state,
    texture_extent, write_material_texture,
};
use super::vertex::{MeshVertex, mesh_vertices};
use crate::camera::OrbitCamera;
use crate::scene::{Material, RenderObject, Scene};

/// Camera uniform data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Direction towards the light; w is unused
    pub light_dir: [f32; 4],
}

impl CameraUniform {
    /// Uniform for `camera` at the given aspect ratio. The light sits at the
    /// eye.
    pub fn new(camera: &OrbitCamera, aspect: f32) -> Self {
        let light = (camera.eye_position() - camera.target).normalize_or(Vec3::Z);
        Self {
            view_proj: camera.view_projection_matrix(aspect).to_cols_array_2d(),
            light_dir: light.extend(0.0).to_array(),
        }
    }
}

/// Per-object uniform data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn new(transform: Mat4) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            normal: transform.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// GPU copy of one render object and its material.
struct GpuObject {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    generation: u64,
    visible: bool,
}

/// Depth attachment matching the current target size.
struct DepthTarget {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Draws a [`Scene`] into a color target.
///
/// GPU objects follow the scene through [`SceneRenderer::sync`]: new meshes
/// are uploaded, removed ones are released, and a material is re-uploaded
/// when its generation changes. Objects without a material are not drawn.
pub struct SceneRenderer {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    depth: DepthTarget,
    objects: HashMap<Uuid, GpuObject>,
}

impl SceneRenderer {
    /// Creates a renderer for color targets of `format`.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Textured Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/textured.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
            });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::VERTEX),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::new(&OrbitCamera::default(), 1.0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Textured Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Textured Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            // Open meshes such as the cup show their inside, so both faces are drawn
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        Self {
            format,
            pipeline,
            camera_buffer,
            camera_bind_group,
            object_bind_group_layout,
            sampler: create_material_sampler(device),
            depth: DepthTarget {
                texture: depth_texture,
                view: depth_view,
                width: width.max(1),
                height: height.max(1),
            },
            objects: HashMap::new(),
        }
    }

    /// Returns the color target format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Resize the depth attachment to match a new target size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.depth.width == width && self.depth.height == height {
            return;
        }
        let (texture, view) = create_depth_texture(device, width, height);
        self.depth = DepthTarget {
            texture,
            view,
            width,
            height,
        };
    }

    /// Bring the GPU objects in line with `scene`.
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        self.objects.retain(|id, _| scene.contains(*id));

        for object in scene.objects() {
            let Some(material) = scene.material(object.id) else {
                continue;
            };
            if material.texture.width() == 0 || material.texture.height() == 0 {
                continue;
            }

            match self.objects.get_mut(&object.id) {
                Some(gpu) => {
                    gpu.visible = object.visible;
                    queue.write_buffer(
                        &gpu.uniform_buffer,
                        0,
                        bytemuck::cast_slice(&[ObjectUniform::new(object.transform)]),
                    );
                    if gpu.generation != material.generation {
                        if gpu.texture.size() != texture_extent(&material.texture) {
                            gpu.texture = create_material_texture(device, &material.texture);
                            gpu.bind_group = object_bind_group(
                                device,
                                &self.object_bind_group_layout,
                                &self.sampler,
                                &gpu.uniform_buffer,
                                &gpu.texture,
                            );
                        }
                        write_material_texture(queue, &gpu.texture, &material.texture);
                        gpu.generation = material.generation;
                    }
                }
                None => {
                    let gpu = self.upload(device, queue, object, material);
                    self.objects.insert(object.id, gpu);
                }
            }
        }
    }

    fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        object: &RenderObject,
        material: &Material,
    ) -> GpuObject {
        tracing::debug!(mesh = %object.id, "Uploading mesh to GPU");

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh_vertices(&object.mesh)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&object.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ObjectUniform::new(object.transform)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture = create_material_texture(device, &material.texture);
        write_material_texture(queue, &texture, &material.texture);
        let bind_group = object_bind_group(
            device,
            &self.object_bind_group_layout,
            &self.sampler,
            &uniform_buffer,
            &texture,
        );

        GpuObject {
            vertex_buffer,
            index_buffer,
            index_count: object.mesh.indices.len() as u32,
            uniform_buffer,
            texture,
            bind_group,
            generation: material.generation,
            visible: object.visible,
        }
    }

    /// Record the scene pass into `encoder`, clearing `target` to `background`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        queue: &wgpu::Queue,
        camera: &OrbitCamera,
        background: wgpu::Color,
    ) {
        let aspect = self.depth.width as f32 / self.depth.height as f32;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(camera, aspect)]),
        );

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(background),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        for object in self.objects.values().filter(|o| o.visible) {
            pass.set_bind_group(1, &object.bind_group, &[]);
            pass.set_vertex_buffer(0, object.vertex_buffer.slice(..));
            pass.set_index_buffer(object.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..object.index_count, 0, 0..1);
        }
    }
}

fn object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
    texture: &wgpu::Texture,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 128);
    }

    #[test]
    fn test_light_follows_eye() {
        let mut camera = OrbitCamera::default();
        camera.set_view(0.0, std::f32::consts::FRAC_PI_2);
        let uniform = CameraUniform::new(&camera, 1.0);
        assert_relative_eq!(uniform.light_dir[0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(uniform.light_dir[1], 0.0, epsilon = 1e-5);
        assert_relative_eq!(uniform.light_dir[2], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let uniform = ObjectUniform::new(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        assert_relative_eq!(uniform.normal[0][0], 0.5);
        assert_relative_eq!(uniform.normal[1][1], 1.0);
    }
}
