mod gpu;

fn main() {
    gpu::run();
}
