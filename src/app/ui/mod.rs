mod controls;
mod fps;
mod panels;
