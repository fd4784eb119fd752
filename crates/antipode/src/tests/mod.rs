mod camera;
mod markers;
mod visualizer;
