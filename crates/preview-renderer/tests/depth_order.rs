//! Renders small scenes offscreen and reads the pixels back.
//!
//! Needs a wgpu adapter; without one (headless CI without a software
//! rasterizer) the tests return early.

use std::sync::Arc;

use futures::executor::block_on;
use image::{Rgba, RgbaImage};
use preview_core::{Mesh, SceneHost};
use preview_renderer::{OrbitCamera, Scene, SceneRenderer};

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))?;
    block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            memory_hints: wgpu::MemoryHints::default(),
        },
        None,
    ))
    .ok()
}

/// Single triangle with texture coordinates, from OBJ text
fn triangle(name: &str, corners: [[f32; 3]; 3]) -> Arc<Mesh> {
    let mut obj = String::new();
    for [x, y, z] in corners {
        obj.push_str(&format!("v {x} {y} {z}\n"));
    }
    obj.push_str("vt 0 0\nvt 1 0\nvt 0.5 1\nf 1/1 2/2 3/3\n");
    Arc::new(Mesh::from_obj_bytes(name, obj.as_bytes()).unwrap())
}

fn solid(color: [u8; 4]) -> Arc<RgbaImage> {
    Arc::new(RgbaImage::from_pixel(4, 4, Rgba(color)))
}

fn front_camera() -> OrbitCamera {
    let mut camera = OrbitCamera::default();
    camera.set_view(0.0, std::f32::consts::FRAC_PI_2);
    camera
}

/// Render `scene` and return the center pixel
fn center_pixel(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    renderer: &mut SceneRenderer,
    scene: &Scene,
) -> [u8; 4] {
    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Test Target"),
        size: wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    renderer.sync(device, queue, scene);

    // 64 pixels * 4 bytes is already row aligned
    let bytes_per_row = SIZE * 4;
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback"),
        size: (bytes_per_row * SIZE) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Test Encoder"),
    });
    renderer.render(&mut encoder, &view, queue, &front_camera(), wgpu::Color::BLACK);
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &readback,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(SIZE),
            },
        },
        target.size(),
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        sender.send(result).unwrap();
    });
    device.poll(wgpu::Maintain::Wait);
    receiver.recv().unwrap().unwrap();

    let data = slice.get_mapped_range();
    let offset = ((SIZE / 2) * bytes_per_row + (SIZE / 2) * 4) as usize;
    [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]
}

#[test]
fn test_nearer_surface_hides_farther_one() {
    let Some((device, queue)) = device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };

    // A slants through the view axis at z = -3. Its vertices average
    // z = -4.67, farther than the small triangle B at z = -4 that sits
    // behind it on the axis.
    let a = triangle("a", [[-4.0, -1.0, -8.0], [4.0, -1.0, -8.0], [0.0, 1.0, 2.0]]);
    let b = triangle("b", [[-0.2, -0.2, -4.0], [0.2, -0.2, -4.0], [0.0, 0.2, -4.0]]);

    // Add them in both orders; the result must not depend on draw order
    for order in [[&a, &b], [&b, &a]] {
        let mut scene = Scene::new();
        scene.bind_material(a.id, solid([255, 0, 0, 255]));
        scene.bind_material(b.id, solid([0, 0, 255, 255]));
        for mesh in order {
            scene.add_mesh(mesh);
        }

        let mut renderer = SceneRenderer::new(&device, FORMAT, SIZE, SIZE);
        let pixel = center_pixel(&device, &queue, &mut renderer, &scene);
        assert!(pixel[0] > 0, "front surface not drawn: {pixel:?}");
        assert_eq!(pixel[2], 0, "hidden surface shows through: {pixel:?}");
    }
}

#[test]
fn test_mesh_without_material_is_not_drawn() {
    let Some((device, queue)) = device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };

    let mut scene = Scene::new();
    scene.add_mesh(&triangle("bare", [[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]]));

    let mut renderer = SceneRenderer::new(&device, FORMAT, SIZE, SIZE);
    assert_eq!(center_pixel(&device, &queue, &mut renderer, &scene), [0, 0, 0, 255]);
}

#[test]
fn test_rebound_material_is_uploaded() {
    let Some((device, queue)) = device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };

    let mesh = triangle("panel", [[-2.0, -2.0, 0.0], [2.0, -2.0, 0.0], [0.0, 2.0, 0.0]]);
    let mut scene = Scene::new();
    scene.add_mesh(&mesh);
    scene.bind_material(mesh.id, solid([255, 0, 0, 255]));

    let mut renderer = SceneRenderer::new(&device, FORMAT, SIZE, SIZE);
    let first = center_pixel(&device, &queue, &mut renderer, &scene);
    assert!(first[0] > 0 && first[1] == 0, "{first:?}");

    scene.bind_material(mesh.id, solid([0, 255, 0, 255]));
    let pixel = center_pixel(&device, &queue, &mut renderer, &scene);
    assert!(pixel[1] > 0 && pixel[0] == 0, "{pixel:?}");
}
