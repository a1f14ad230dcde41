//! # Path 模块
//!
//! 面板背景用的 2D 路径类型与构建器。
//!
//! 路径构建是纯几何运算：同样的输入序列永远产出逐位相同的
//! 段列表，背景缓存的指纹比较依赖这一点。

/// 2D 点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// 创建点
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 路径段
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// 起笔
    MoveTo(Point),
    /// 直线
    LineTo(Point),
    /// 三次贝塞尔（两个控制点 + 终点）
    CurveTo(Point, Point, Point),
    /// 闭合
    Close,
}

/// 闭合 2D 路径
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// 段列表
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// 是否为空路径
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 段数
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

/// 路径构建器
///
/// [`edge_to`](PathBuilder::edge_to) 是造型的关键：目标点与
/// 落笔点水平或垂直对齐时画直线，斜向时画三次贝塞尔，
/// 两个控制点都放在 x 中线上 —— 面板轮廓的"software curve"
/// 就是这么来的。
#[derive(Debug, Default)]
pub struct PathBuilder {
    segments: Vec<PathSegment>,
    cursor: Point,
}

impl PathBuilder {
    /// 创建空构建器
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            cursor: Point::new(0.0, 0.0),
        }
    }

    /// 当前落笔点
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// 起笔
    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = Point::new(x, y);
        self.segments.push(PathSegment::MoveTo(p));
        self.cursor = p;
    }

    /// 画一条边：对齐走直线，斜向走中线控制点的贝塞尔
    pub fn edge_to(&mut self, x: f32, y: f32) {
        let target = Point::new(x, y);
        if self.cursor.x == x || self.cursor.y == y {
            self.segments.push(PathSegment::LineTo(target));
        } else {
            let xm = (self.cursor.x + x) / 2.0;
            self.segments.push(PathSegment::CurveTo(
                Point::new(xm, self.cursor.y),
                Point::new(xm, y),
                target,
            ));
        }
        self.cursor = target;
    }

    /// 闭合当前子路径
    pub fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }

    /// 产出路径
    pub fn build(self) -> Path {
        Path {
            segments: self.segments,
        }
    }
}

/// 轴对齐矩形
pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Path {
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    pb.edge_to(x + width, y);
    pb.edge_to(x + width, y + height);
    pb.edge_to(x, y + height);
    pb.close();
    pb.build()
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
