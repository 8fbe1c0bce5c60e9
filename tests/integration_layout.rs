#[cfg(test)]
mod tests {
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::buffer::Buffer;
    use ratatui::prelude::{Direction, Rect};
    use term_tiles::components::{TextFeed, TextPane};
    use term_tiles::{AUTO_SIZE, Layout, MouseAction, Region};

    fn pane() -> TextPane {
        TextPane::new(TextFeed::new())
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn item_lengths(layout: &Layout, direction: Direction) -> Vec<u16> {
        layout
            .items()
            .iter()
            .map(|item| {
                let rect = item.region().rect();
                match direction {
                    Direction::Horizontal => rect.width,
                    Direction::Vertical => rect.height,
                }
            })
            .collect()
    }

    #[test]
    fn test_forty_columns_two_auto_items() {
        let mut layout = Layout::new()
            .with_direction(Direction::Horizontal)
            .with_separators(true)
            .with_item(pane(), AUTO_SIZE)
            .with_item(pane(), AUTO_SIZE);
        let area = Rect::new(0, 0, 40, 10);
        layout.set_rect(area);
        let mut buf = Buffer::empty(area);
        layout.draw(&mut buf);

        assert_eq!(item_lengths(&layout, Direction::Horizontal), vec![19, 19]);
        assert_eq!(layout.splitters().len(), 1);
        let consumed: u16 = item_lengths(&layout, Direction::Horizontal).iter().sum::<u16>() + 1;
        assert_eq!(consumed, 39);
        assert_eq!(buf.cell((19, 5)).unwrap().symbol(), "│");
        assert_eq!(buf.cell((39, 5)).unwrap().symbol(), " ");
    }

    #[test]
    fn test_consumed_length_leaves_small_remainder() {
        for length in [7u16, 23, 40, 81] {
            for sizes in [
                vec![AUTO_SIZE, AUTO_SIZE, AUTO_SIZE],
                vec![2, AUTO_SIZE, 3],
                vec![AUTO_SIZE, 1, AUTO_SIZE, 1],
            ] {
                let mut layout = Layout::new().with_direction(Direction::Vertical);
                for size in &sizes {
                    layout.add_item(pane(), *size);
                }
                let area = Rect::new(0, 0, 5, length);
                layout.set_rect(area);
                let mut buf = Buffer::empty(area);
                layout.draw(&mut buf);

                let auto = sizes.iter().filter(|s| **s == AUTO_SIZE).count() as u16;
                let used: u16 = item_lengths(&layout, Direction::Vertical).iter().sum::<u16>()
                    + (sizes.len() as u16 - 1);
                assert!(used <= length, "{sizes:?} in {length} used {used}");
                assert!(length - used < auto, "{sizes:?} in {length} left {}", length - used);
            }
        }
    }

    #[test]
    fn test_splitter_count_after_mutations() {
        let mut layout = Layout::new().with_direction(Direction::Horizontal);
        for count in 1..=5 {
            layout.add_item(pane(), AUTO_SIZE);
            assert_eq!(layout.splitters().len(), count - 1);
        }
        layout.set_rect(Rect::new(0, 0, 30, 3));
        assert_eq!(layout.splitters().len(), 4);
        layout.remove_item(2);
        assert_eq!(layout.splitters().len(), 3);
        let pairs: Vec<(usize, usize)> = layout.splitters().iter().map(|s| s.items()).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_drag_changes_only_neighbours() {
        let mut layout = Layout::new()
            .with_direction(Direction::Horizontal)
            .with_separators(true)
            .with_item(pane(), 6)
            .with_item(pane(), AUTO_SIZE)
            .with_item(pane(), AUTO_SIZE)
            .with_item(pane(), 6);
        let area = Rect::new(0, 0, 40, 4);
        layout.set_rect(area);
        let mut buf = Buffer::empty(area);
        layout.draw(&mut buf);
        // 40 - 12 - 3 = 25 / 2 = 12
        assert_eq!(item_lengths(&layout, Direction::Horizontal), vec![6, 12, 12, 6]);
        let (x, y) = layout.splitters()[1].begin();
        assert_eq!((x, y), (19, 0));

        let press = mouse(MouseEventKind::Down(MouseButton::Left), 19, 2);
        assert!(layout.handle_mouse(MouseAction::LeftDown, &press).capture);
        let drag = mouse(MouseEventKind::Drag(MouseButton::Left), 16, 1);
        layout.handle_mouse(MouseAction::Move, &drag);
        let release = mouse(MouseEventKind::Up(MouseButton::Left), 16, 1);
        layout.handle_mouse(MouseAction::LeftUp, &release);

        let sizes: Vec<u16> = layout.items().iter().map(|item| item.size()).collect();
        assert_eq!(sizes, vec![6, 9, 15, 6]);
        let begins: Vec<(i32, i32)> = layout.splitters().iter().map(|s| s.begin()).collect();
        assert_eq!(begins, vec![(6, 0), (16, 0), (32, 0)]);

        layout.draw(&mut buf);
        assert_eq!(item_lengths(&layout, Direction::Horizontal), vec![6, 9, 15, 6]);
        assert_eq!(buf.cell((16, 0)).unwrap().symbol(), "║");
        assert_eq!(buf.cell((32, 0)).unwrap().symbol(), "│");
    }

    #[test]
    fn test_nested_layouts_drag_inner_splitter() {
        let inner = Layout::new()
            .with_direction(Direction::Horizontal)
            .with_item(pane(), AUTO_SIZE)
            .with_item(pane(), AUTO_SIZE);
        let mut outer = Layout::new()
            .with_direction(Direction::Vertical)
            .with_item(inner, AUTO_SIZE)
            .with_item(pane(), AUTO_SIZE);
        let area = Rect::new(0, 0, 21, 11);
        outer.set_rect(area);
        let mut buf = Buffer::empty(area);
        outer.draw(&mut buf);

        // inner band is rows 0..5, its splitter is column 10
        let press = mouse(MouseEventKind::Down(MouseButton::Left), 10, 2);
        assert!(outer.handle_mouse(MouseAction::LeftDown, &press).capture);
        // moving outside the inner band keeps routing to it
        let drag = mouse(MouseEventKind::Drag(MouseButton::Left), 13, 9);
        assert!(outer.handle_mouse(MouseAction::Move, &drag).consumed);
        let release = mouse(MouseEventKind::Up(MouseButton::Left), 13, 9);
        outer.handle_mouse(MouseAction::LeftUp, &release);
        outer.draw(&mut buf);

        let band = outer.item(0).unwrap().region().rect();
        assert_eq!(band, Rect::new(0, 0, 21, 5));
        // outer sizes were not touched
        assert!(outer.items().iter().all(|item| item.is_auto()));
    }
}
