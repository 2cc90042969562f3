#![no_std]
#![no_main]

mod hardware;

use cortex_m::delay::Delay;
use embedded_hal::digital::v2::OutputPin;
use rp_pico::hal::gpio::DynPin;
use rp_pico::hal::pwm::Slices;
use rp_pico::Pins;

use scribble::stepper::{Direction, Stepper};
use scribble::{Config, Plotter};

use crate::hardware::{read_byte, serial_available, SerialPrinter};

fn start(mut delay: Delay, pins: Pins, pwm_slices: Slices) -> ! {
    // Servo PWM at roughly 95 Hz.
    let mut pwm = pwm_slices.pwm1;
    pwm.set_ph_correct();
    pwm.set_div_int(20);
    pwm.enable();

    let mut servo_channel = pwm.channel_b;
    servo_channel.output_to(pins.gpio19.into_push_pull_output());

    // Status LED; nothing in the motion core reads or drives it.
    let mut led_pin = DynPin::from(pins.led);
    led_pin.into_push_pull_output();
    let _ = led_pin.set_high();

    let motor_a = Stepper::new(
        DynPin::from(pins.gpio2.into_push_pull_output()),
        DynPin::from(pins.gpio3.into_push_pull_output()),
        Direction::Clockwise,
    );
    let motor_b = Stepper::new(
        DynPin::from(pins.gpio4.into_push_pull_output()),
        DynPin::from(pins.gpio5.into_push_pull_output()),
        Direction::CounterClockwise,
    );

    let x_limit = DynPin::from(pins.gpio16.into_pull_up_input());
    let y_limit = DynPin::from(pins.gpio17.into_pull_up_input());

    let mut plotter = Plotter::new(
        Config::default(),
        motor_a,
        motor_b,
        x_limit,
        y_limit,
        servo_channel,
    );

    loop {
        while serial_available() {
            plotter.feed_byte(read_byte(), &mut SerialPrinter, &mut delay);
        }
    }
}
