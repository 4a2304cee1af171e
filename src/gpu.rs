//! wgpu resources that scene components hand to the cleanup registry.
//!
//! wgpu frees GPU memory when the last handle drops, but scene components
//! routinely leak handles into long-lived closures. `destroy()` releases the
//! memory right away regardless of outstanding references.

use crate::core::Disposable;
use wgpu::util::DeviceExt;

impl Disposable for wgpu::Buffer {
    fn dispose(self: Box<Self>) {
        self.destroy();
    }
}

impl Disposable for wgpu::Texture {
    fn dispose(self: Box<Self>) {
        self.destroy();
    }
}

/// Vertex data plus optional 16-bit indices.
pub struct GeometryBuffers {
    pub vertex: wgpu::Buffer,
    pub index: Option<wgpu::Buffer>,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GeometryBuffers {
    pub fn new<V: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &str,
        vertices: &[V],
        indices: Option<&[u16]>,
    ) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = indices.map(|idx| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(idx),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex,
            index,
            vertex_count: vertices.len() as u32,
            index_count: indices.map_or(0, |i| i.len() as u32),
        }
    }
}

impl Disposable for GeometryBuffers {
    fn dispose(self: Box<Self>) {
        self.vertex.destroy();
        if let Some(index) = &self.index {
            index.destroy();
        }
    }
}

/// Uniform buffer and the bind group that exposes it to a pipeline.
pub struct MaterialResources {
    pub uniforms: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Disposable for MaterialResources {
    fn dispose(self: Box<Self>) {
        self.uniforms.destroy();
        // Bind group has no explicit destroy; dropping it is enough.
    }
}

/// Offscreen color target with its default view.
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }
}

impl Disposable for RenderTarget {
    fn dispose(self: Box<Self>) {
        self.texture.destroy();
    }
}
