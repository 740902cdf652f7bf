/// Left-hand panel: paths, parameters, options and the trigger
use iced::widget::{button, checkbox, column, container, progress_bar, row, text, text_input, Column, Row};
use iced::{font, Alignment, Element, Font, Length};

use crate::state::form::{Field, ProcessForm, Toggle};
use crate::Message;

const LABEL_WIDTH: f32 = 150.0;

fn group<'a>(title: &'a str, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    let bold = Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    };

    container(column![text(title).font(bold), content.into()].spacing(10))
        .padding(10)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}

fn field_row(form: &ProcessForm, field: Field, browse: bool) -> Element<'_, Message> {
    let mut line = row![
        text(format!("{}:", field.label())).width(Length::Fixed(LABEL_WIDTH)),
        text_input("", form.value(field))
            .on_input(move |value| Message::FieldChanged(field, value))
            .padding(5),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    if browse {
        line = line.push(button("Browse").on_press(Message::Browse(field)).padding(8));
    }

    line.into()
}

/// Build the form. `busy` disables the trigger; `progress` is 0..=100.
pub fn view<'a>(form: &'a ProcessForm, busy: bool, progress: f32) -> Element<'a, Message> {
    let images = Column::with_children(
        [Field::InputPath, Field::ReferencePath, Field::OutputDir]
            .into_iter()
            .map(|field| field_row(form, field, true)),
    )
    .spacing(8);

    let params = Column::with_children(Field::PARAMS.into_iter().map(|field| field_row(form, field, false)))
        .spacing(8);

    let options = Row::with_children(Toggle::ALL.into_iter().map(|toggle| -> Element<'a, Message> {
        checkbox(toggle.label(), form.is_set(toggle))
            .on_toggle(move |checked| Message::Toggled(toggle, checked))
            .into()
    }))
    .spacing(20);

    let trigger = button("Process Images")
        .on_press_maybe((!busy).then_some(Message::Process))
        .padding(8)
        .width(Length::Fill);

    column![
        group("Image Selection", images),
        group("Processing Parameters", params),
        group("Options", options),
        trigger,
        progress_bar(0.0..=100.0, progress),
    ]
    .spacing(20)
    .padding(20)
    .into()
}
