// Host-side checks that the wgpu resource wrappers plug into the cleanup registry.

use starlit_journey::core::Disposable;
use starlit_journey::gpu::{GeometryBuffers, MaterialResources, RenderTarget};

fn assert_disposable<T: Disposable + 'static>() {}

#[test]
fn wgpu_resources_are_disposable() {
    assert_disposable::<wgpu::Buffer>();
    assert_disposable::<wgpu::Texture>();
    assert_disposable::<GeometryBuffers>();
    assert_disposable::<MaterialResources>();
    assert_disposable::<RenderTarget>();
}
